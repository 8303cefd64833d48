//! Resume records shared by the form decoder, the JSON endpoints, and the templates.
//!
//! Records live for a single request. Every field is optional on the wire: a
//! missing or `null` value decodes to its zero value, the same way the browser
//! client and the AI assistant produce partial documents.

use serde::{Deserialize, Deserializer, Serialize};

pub const DEFAULT_COLOR: &str = "#333333";
pub const DEFAULT_TEMPLATE: &str = "classic";
pub const DEFAULT_PAPER_SIZE: &str = "a4";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Experience {
    #[serde(deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(deserialize_with = "null_as_default")]
    pub company: String,
    /// Free-text label such as `2021 - present`, never parsed.
    #[serde(deserialize_with = "null_as_default")]
    pub date: String,
    #[serde(deserialize_with = "null_as_default")]
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Education {
    #[serde(deserialize_with = "null_as_default")]
    pub degree: String,
    #[serde(deserialize_with = "null_as_default")]
    pub school: String,
    #[serde(deserialize_with = "null_as_default")]
    pub date: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeConfig {
    #[serde(deserialize_with = "null_as_default")]
    pub template: String,
    #[serde(deserialize_with = "null_as_default")]
    pub color: String,
    #[serde(deserialize_with = "null_as_default")]
    pub font: String,
    #[serde(deserialize_with = "null_as_default")]
    pub font_size: String,
    #[serde(deserialize_with = "null_as_default")]
    pub paper_size: String,
}

/// Characters that would let a font value end its CSS declaration.
const CSS_BREAKOUT: &[char] = &[';', '{', '}'];

impl ThemeConfig {
    /// Fills empty template, color, and paper size with the site defaults.
    ///
    /// The theme ends up in an inline `style` attribute, so a color that is
    /// not `#rrggbb` is replaced by the default and font values lose any
    /// `;`, `{` or `}`.
    pub fn apply_defaults(&mut self) {
        if !is_hex_color(self.color.trim()) {
            self.color = DEFAULT_COLOR.to_string();
        }
        self.font.retain(|c| !CSS_BREAKOUT.contains(&c));
        self.font_size.retain(|c| !CSS_BREAKOUT.contains(&c));
        fill_if_empty(&mut self.template, DEFAULT_TEMPLATE);
        fill_if_empty(&mut self.paper_size, DEFAULT_PAPER_SIZE);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Resume {
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub email: String,
    #[serde(deserialize_with = "null_as_default")]
    pub phone: String,
    /// Public path or URL of the avatar image.
    #[serde(deserialize_with = "null_as_default")]
    pub avatar: String,
    #[serde(deserialize_with = "null_as_default")]
    pub summary: String,
    #[serde(deserialize_with = "null_as_default")]
    pub experience: Vec<Experience>,
    #[serde(deserialize_with = "null_as_default")]
    pub education: Vec<Education>,
    #[serde(deserialize_with = "null_as_default")]
    pub config: ThemeConfig,
}

impl Resume {
    pub fn with_defaults(mut self) -> Self {
        self.config.apply_defaults();
        self
    }
}

fn is_hex_color(value: &str) -> bool {
    value
        .strip_prefix('#')
        .is_some_and(|hex| hex.len() == 6 && hex.chars().all(|c| c.is_ascii_hexdigit()))
}

fn fill_if_empty(slot: &mut String, default: &str) {
    if slot.trim().is_empty() {
        *slot = default.to_string();
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Sample resume used to pre-fill the editor when a template is picked from the gallery.
pub fn demo_resume() -> Resume {
    Resume {
        name: "Alex Chen".to_string(),
        email: "alex.chen@example.com".to_string(),
        phone: "13800138000".to_string(),
        avatar: String::new(),
        summary: "Senior software engineer with five years of full-stack experience \
                  across Go, Python, and React. Builds fast, scalable web applications."
            .to_string(),
        experience: vec![
            Experience {
                title: "Senior Backend Engineer".to_string(),
                company: "Northwind Technology".to_string(),
                date: "2021 - present".to_string(),
                description: "Designed and built the core order platform; led the move to \
                              services and tripled peak throughput."
                    .to_string(),
            },
            Experience {
                title: "Full-Stack Engineer".to_string(),
                company: "Future Networks".to_string(),
                date: "2018 - 2021".to_string(),
                description: "Rebuilt the payments module of an e-commerce platform and held \
                              99.99% availability."
                    .to_string(),
            },
        ],
        education: vec![Education {
            degree: "B.Sc. Computer Science".to_string(),
            school: "State University".to_string(),
            date: "2014 - 2018".to_string(),
        }],
        config: ThemeConfig::default(),
    }
}
