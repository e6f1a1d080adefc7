use serde::Deserialize;

pub const DEFAULT_DISPLAY_NAME: &str = "Friend";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetDisplayNameRequest {
    #[serde(default)]
    pub display_name: String,
}

impl SetDisplayNameRequest {
    /// Trimmed name, or the default when blank.
    pub fn display_name(&self) -> String {
        match self.display_name.trim() {
            "" => DEFAULT_DISPLAY_NAME.to_string(),
            name => name.chars().take(64).collect(),
        }
    }
}
