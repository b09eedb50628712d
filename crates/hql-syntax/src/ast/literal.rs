use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Query literals
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Literal {
    String(String),
    Integer(i32),
    Long(i64),
    Double(f64),
    Decimal(BigDecimal),
    Boolean(bool),
    Null,
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::String(s) => write!(f, "'{}'", s.replace('\'', "''")),
            Literal::Integer(n) => write!(f, "{}", n),
            Literal::Long(n) => write!(f, "{}L", n),
            Literal::Double(n) => write!(f, "{:?}", n),
            Literal::Decimal(n) => write!(f, "{}BD", n),
            Literal::Boolean(b) => write!(f, "{}", b),
            Literal::Null => write!(f, "null"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_literal_display() {
        assert_eq!(
            format!("{}", Literal::String("Robot Dreams".to_string())),
            "'Robot Dreams'"
        );
        assert_eq!(format!("{}", Literal::Integer(1950)), "1950");
        assert_eq!(format!("{}", Literal::Long(7)), "7L");
        assert_eq!(format!("{}", Literal::Double(0.5)), "0.5");
        assert_eq!(
            format!("{}", Literal::Decimal(BigDecimal::from_str("123.50").unwrap())),
            "123.50BD"
        );
        assert_eq!(format!("{}", Literal::Boolean(true)), "true");
        assert_eq!(format!("{}", Literal::Null), "null");
    }
}
