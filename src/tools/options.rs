use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::options::{Mode, OptionLists};
use crate::suggest::Suggestions;

#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct OptionsRequest {
    /// "food" (default) or "cafe"; selects which categories and menu suggestions to return.
    pub mode: Option<Mode>,
}

#[derive(Debug, Serialize)]
pub struct OptionsResponse<'a> {
    pub options: &'a OptionLists,
    pub rating_steps: Vec<f64>,
    pub suggestions: Suggestions,
}
