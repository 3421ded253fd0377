//! Fills `{{name}}` placeholder tokens in an HTML receipt template.
//!
//! Substitution is literal: every `(token, value)` pair of a
//! [PlaceholderMap] is applied to the whole document, in map order, and
//! values are inserted verbatim (no escaping). Tokens the map does not
//! know about are left in place.
//!
//! ```
//! use receipt_template::{PlaceholderMap, Template};
//!
//! let template = Template::from("<p>{{nome_cliente}}</p>");
//! let map = PlaceholderMap::try_from_pairs([("nome_cliente", "João da Silva")]).unwrap();
//! assert_eq!(template.fill(&map).html, "<p>João da Silva</p>");
//! ```

mod items;
mod placeholder;
mod sample;
mod template;

pub use common::{MyResult, AnyErr};
pub use items::*;
pub use placeholder::*;
pub use sample::*;
pub use template::*;
