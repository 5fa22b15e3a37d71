//! Method descriptors as handed over by the assembly front end.

use serde::{Deserialize, Serialize};

use crate::instr::Op;

/// A compiled managed method, pre-translation.
///
/// `name` is the identity key: the unique full-signature string that
/// correlates this descriptor with its registered record across the draft
/// and final passes, and with call operands in other method bodies.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MethodDescriptor {
    pub name: String,
    #[serde(default)]
    pub flags: u16,
    #[serde(default)]
    pub locals: u16,
    /// Instruction list; `None` for abstract and native methods.
    #[serde(default)]
    pub body: Option<Vec<Op>>,
}

impl MethodDescriptor {
    pub fn with_body(name: impl Into<String>, body: Vec<Op>) -> Self {
        Self {
            name: name.into(),
            flags: 0,
            locals: 0,
            body: Some(body),
        }
    }

    pub fn without_body(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            flags: 0,
            locals: 0,
            body: None,
        }
    }

    #[inline]
    pub fn has_body(&self) -> bool {
        self.body.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serde_roundtrip() {
        let method = MethodDescriptor {
            name: "Demo.App::Main()".to_string(),
            flags: 0x0006,
            locals: 2,
            body: Some(vec![Op::LdStr("hello".into()), Op::Ret]),
        };

        let json = serde_json::to_string(&method).unwrap();
        let back: MethodDescriptor = serde_json::from_str(&json).unwrap();
        assert_eq!(back, method);
    }

    #[test]
    fn missing_fields_default() {
        let method: MethodDescriptor =
            serde_json::from_str(r#"{"name": "Demo.App::.cctor()"}"#).unwrap();
        assert_eq!(method.flags, 0);
        assert_eq!(method.locals, 0);
        assert!(!method.has_body());
    }
}
