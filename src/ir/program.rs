//! Top-level IR containers: [`Program`], [`Function`], [`Arg`].

use serde::{Deserialize, Serialize};

use super::instr::Instruction;
use super::types::Type;

/// A function parameter: a name and a type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Arg {
    /// The parameter name.
    pub name: String,
    /// The parameter's type.
    #[serde(rename = "type")]
    pub ty: Type,
}

/// A function: name, parameters, optional return type, and instruction list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Function {
    /// The function's name.
    pub name: String,
    /// Ordered parameter list.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<Arg>,
    /// The function's return type, if any.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub ret_type: Option<Type>,
    /// The function's ordered instruction list.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub instrs: Vec<Instruction>,
}

/// A whole program: an ordered list of functions.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Program {
    /// The program's functions, in source order.
    pub functions: Vec<Function>,
}

impl Program {
    /// Parse a program from a JSON reader.
    pub fn from_reader<R: std::io::Read>(reader: R) -> crate::error::Result<Self> {
        Ok(serde_json::from_reader(reader)?)
    }

    /// Write the program as pretty-printed, stably-ordered JSON.
    pub fn to_writer<W: std::io::Write>(&self, writer: W) -> crate::error::Result<()> {
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn program_round_trips_through_json() {
        let src = r#"{
            "functions": [
                {
                    "name": "main",
                    "args": [{"name": "x", "type": "int"}],
                    "instrs": [
                        {"label": "entry"},
                        {"op": "const", "dest": "v", "type": "int", "value": 1},
                        {"op": "print", "args": ["v"]},
                        {"op": "ret"}
                    ]
                }
            ]
        }"#;
        let program = Program::from_reader(src.as_bytes()).unwrap();
        assert_eq!(program.functions.len(), 1);
        let func = &program.functions[0];
        assert_eq!(func.name, "main");
        assert_eq!(func.args[0].name, "x");
        assert_eq!(func.instrs.len(), 4);

        let mut buf = Vec::new();
        program.to_writer(&mut buf).unwrap();
        let back = Program::from_reader(buf.as_slice()).unwrap();
        assert_eq!(back, program);
    }

    #[test]
    fn malformed_json_is_malformed_input_error() {
        let err = Program::from_reader("not json".as_bytes()).unwrap_err();
        assert!(matches!(err, crate::error::Error::MalformedInput(_)));
    }
}
