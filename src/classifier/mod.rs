//! Text heuristics used to pick the highlighted media for a chat message.

pub mod render;
pub mod rules;
pub mod scene;
pub mod url;

pub use render::{render_message_text, Span};
pub use rules::RuleSet;
pub use scene::{Scene, SceneCatalog};
pub use url::{extract_first_url, normalize_url};
