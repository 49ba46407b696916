/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::fmt;

use chrono::NaiveDateTime;

use crate::variable::Variable;

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Boolean(bool),
    Long(i64),
    Double(f64),
    String(String),
    DateTime(NaiveDateTime),
}

impl Literal {
    pub fn data_type(&self) -> DataType {
        match self {
            Literal::Boolean(_) => DataType::Boolean,
            Literal::Long(_) => DataType::Long,
            Literal::Double(_) => DataType::Double,
            Literal::String(_) => DataType::String,
            Literal::DateTime(_) => DataType::DateTime,
        }
    }
}

impl From<&str> for Literal {
    fn from(value: &str) -> Self {
        Literal::String(value.to_owned())
    }
}

impl From<i64> for Literal {
    fn from(value: i64) -> Self {
        Literal::Long(value)
    }
}

impl From<f64> for Literal {
    fn from(value: f64) -> Self {
        Literal::Double(value)
    }
}

impl From<bool> for Literal {
    fn from(value: bool) -> Self {
        Literal::Boolean(value)
    }
}

impl From<NaiveDateTime> for Literal {
    fn from(value: NaiveDateTime) -> Self {
        Literal::DateTime(value)
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Boolean(value) => write!(f, "{value}"),
            Literal::Long(value) => write!(f, "{value}"),
            Literal::Double(value) => write!(f, "{value:?}"),
            Literal::String(value) => write!(f, "{value:?}"),
            Literal::DateTime(value) => write!(f, "{}", value.format("%Y-%m-%dT%H:%M:%S%.f")),
        }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum DataType {
    Boolean,
    Long,
    Double,
    String,
    DateTime,
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DataType::Boolean => "boolean",
            DataType::Long => "long",
            DataType::Double => "double",
            DataType::String => "string",
            DataType::DateTime => "datetime",
        };
        write!(f, "{name}")
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Comparator {
    Equal,
    NotEqual,
    Less,
    LessOrEqual,
    Greater,
    GreaterOrEqual,
    Contains,
    Like,
}

impl Comparator {
    /// The comparator to apply with the operands swapped. String matching has no mirrored form.
    pub fn flip(self) -> Option<Comparator> {
        match self {
            Comparator::Equal => Some(Comparator::Equal),
            Comparator::NotEqual => Some(Comparator::NotEqual),
            Comparator::Less => Some(Comparator::Greater),
            Comparator::LessOrEqual => Some(Comparator::GreaterOrEqual),
            Comparator::Greater => Some(Comparator::Less),
            Comparator::GreaterOrEqual => Some(Comparator::LessOrEqual),
            Comparator::Contains | Comparator::Like => None,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Comparator::Equal => "==",
            Comparator::NotEqual => "!=",
            Comparator::Less => "<",
            Comparator::LessOrEqual => "<=",
            Comparator::Greater => ">",
            Comparator::GreaterOrEqual => ">=",
            Comparator::Contains => "contains",
            Comparator::Like => "like",
        }
    }
}

impl fmt::Display for Comparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Literal(Literal),
    Variable(Variable),
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Literal(literal) => write!(f, "{literal}"),
            Operand::Variable(variable) => write!(f, "{variable}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ValuePredicate {
    comparator: Comparator,
    operand: Operand,
}

impl ValuePredicate {
    pub fn new(comparator: Comparator, operand: Operand) -> Self {
        Self { comparator, operand }
    }

    pub fn comparator(&self) -> Comparator {
        self.comparator
    }

    pub fn operand(&self) -> &Operand {
        &self.operand
    }

    /// The literal this predicate pins the value to, if it is an equality against a constant.
    pub fn equality_literal(&self) -> Option<&Literal> {
        match (&self.comparator, &self.operand) {
            (Comparator::Equal, Operand::Literal(literal)) => Some(literal),
            _ => None,
        }
    }

    pub fn inner_variable(&self) -> Option<Variable> {
        match &self.operand {
            Operand::Variable(variable) => Some(*variable),
            Operand::Literal(_) => None,
        }
    }
}

impl fmt::Display for ValuePredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.comparator, self.operand)
    }
}
