use std::collections::HashMap;

use crate::members::repo::Member;

/// Display-name lookup; unknown members show their raw id.
pub struct Roster<'a> {
    names: HashMap<&'a str, &'a str>,
}

impl<'a> Roster<'a> {
    pub fn new(members: &'a [Member]) -> Self {
        Self {
            names: members
                .iter()
                .map(|m| (m.id.as_str(), m.display_name.as_str()))
                .collect(),
        }
    }

    pub fn name_of(&self, member_id: &str) -> String {
        match self.names.get(member_id) {
            Some(name) if !name.trim().is_empty() => (*name).to_string(),
            _ => member_id.to_string(),
        }
    }
}
