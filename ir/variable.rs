/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{collections::HashMap, fmt};

use resource::constants::ir::VARIABLE_ID_LIMIT;

use crate::PatternDefinitionError;

/// A slot in a pattern. Named variables are chosen by the caller and appear in answers;
/// anonymous variables are synthesised while lowering and may be optimised away.
#[derive(Copy, Clone, Hash, Eq, PartialEq)]
pub struct Variable {
    id: u16,
    anonymous: bool,
}

impl Variable {
    pub fn new(id: u16) -> Self {
        Self { id, anonymous: false }
    }

    pub fn new_anonymous(id: u16) -> Self {
        Self { id, anonymous: true }
    }

    pub fn id(&self) -> u16 {
        self.id
    }

    pub fn is_anonymous(&self) -> bool {
        self.anonymous
    }

    pub fn is_named(&self) -> bool {
        !self.anonymous
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.anonymous {
            write!(f, "$_{}", self.id)
        } else {
            write!(f, "${}", self.id)
        }
    }
}

impl fmt::Debug for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

/// Allocates variable ids for one pattern. Named and anonymous variables share one id space.
#[derive(Debug, Clone, Default)]
pub struct VariableRegistry {
    variables: HashMap<String, Variable>,
    names: HashMap<Variable, String>,
    next_id: u16,
}

impl VariableRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_declare_variable(&mut self, name: &str) -> Result<Variable, PatternDefinitionError> {
        if name.is_empty() {
            return Err(PatternDefinitionError::EmptyVariableName {});
        }
        if let Some(variable) = self.variables.get(name) {
            return Ok(*variable);
        }
        let variable = Variable::new(self.allocate_id()?);
        self.variables.insert(name.to_owned(), variable);
        self.names.insert(variable, name.to_owned());
        Ok(variable)
    }

    pub fn create_anonymous_variable(&mut self) -> Result<Variable, PatternDefinitionError> {
        Ok(Variable::new_anonymous(self.allocate_id()?))
    }

    fn allocate_id(&mut self) -> Result<u16, PatternDefinitionError> {
        if self.next_id == VARIABLE_ID_LIMIT {
            return Err(PatternDefinitionError::VariableIdLimitExceeded { limit: VARIABLE_ID_LIMIT });
        }
        let id = self.next_id;
        self.next_id += 1;
        Ok(id)
    }

    pub fn get(&self, name: &str) -> Option<Variable> {
        self.variables.get(name).copied()
    }

    pub fn name_of(&self, variable: Variable) -> Option<&str> {
        self.names.get(&variable).map(String::as_str)
    }

    pub fn variable_names(&self) -> &HashMap<Variable, String> {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.next_id as usize
    }

    pub fn is_empty(&self) -> bool {
        self.next_id == 0
    }
}
