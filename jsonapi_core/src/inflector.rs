//! Word inflection used to derive foreign-key field names and type names.
//!
//! The deserializer depends only on the [`Inflector`] trait. [`English`] is the
//! bundled implementation: a rule table for English singulars plus the
//! `classify` convention of turning a (plural, snake_case) type name into a
//! singular CamelCase class-like name.

use convert_case::{Case, Casing};
use regex::Regex;

/// Naming service consumed by the deserializer.
pub trait Inflector {
    /// Returns the singular form of `word` (`"comments"` -> `"comment"`).
    fn singularize(&self, word: &str) -> String;

    /// Returns the class-like name for a type (`"blog_posts"` -> `"BlogPost"`).
    fn classify(&self, word: &str) -> String;
}

impl<T: Inflector + ?Sized> Inflector for &T {
    fn singularize(&self, word: &str) -> String {
        (**self).singularize(word)
    }

    fn classify(&self, word: &str) -> String {
        (**self).classify(word)
    }
}

/// Singularization rules, lowest priority first. Later rules win.
const SINGULAR_RULES: &[(&str, &str)] = &[
    (r"(?i)s$", ""),
    (r"(?i)(ss)$", "${1}"),
    (r"(?i)(n)ews$", "${1}ews"),
    (r"(?i)([ti])a$", "${1}um"),
    (
        r"(?i)((a)naly|(b)a|(d)iagno|(p)arenthe|(p)rogno|(s)ynop|(t)he)(sis|ses)$",
        "${1}sis",
    ),
    (r"(?i)(^analy)(sis|ses)$", "${1}sis"),
    (r"(?i)([^f])ves$", "${1}fe"),
    (r"(?i)(hive)s$", "${1}"),
    (r"(?i)(tive)s$", "${1}"),
    (r"(?i)([lr])ves$", "${1}f"),
    (r"(?i)([^aeiouy]|qu)ies$", "${1}y"),
    (r"(?i)(s)eries$", "${1}eries"),
    (r"(?i)(m)ovies$", "${1}ovie"),
    (r"(?i)(x|ch|ss|sh)es$", "${1}"),
    (r"(?i)^(m|l)ice$", "${1}ouse"),
    (r"(?i)(bus)(es)?$", "${1}"),
    (r"(?i)(o)es$", "${1}"),
    (r"(?i)(shoe)s$", "${1}"),
    (r"(?i)(cris|test)(is|es)$", "${1}is"),
    (r"(?i)^(a)x[ie]s$", "${1}xis"),
    (r"(?i)(octop|vir)(us|i)$", "${1}us"),
    (r"(?i)(alias|status)(es)?$", "${1}"),
    (r"(?i)^(ox)en", "${1}"),
    (r"(?i)(vert|ind)ices$", "${1}ex"),
    (r"(?i)(matr)ices$", "${1}ix"),
    (r"(?i)(quiz)zes$", "${1}"),
    (r"(?i)(database)s$", "${1}"),
];

/// (singular, plural) pairs that no suffix rule covers.
const IRREGULARS: &[(&str, &str)] = &[
    ("person", "people"),
    ("man", "men"),
    ("child", "children"),
    ("sex", "sexes"),
    ("move", "moves"),
    ("zombie", "zombies"),
];

/// Words whose singular and plural forms are identical.
const UNCOUNTABLES: &[&str] = &[
    "equipment",
    "information",
    "rice",
    "money",
    "species",
    "series",
    "fish",
    "sheep",
    "jeans",
    "police",
];

/// English inflector backed by a regex rule table.
pub struct English {
    /// Highest priority first.
    singulars: Vec<(Regex, String)>,
    uncountables: Vec<Regex>,
}

impl Default for English {
    fn default() -> Self {
        Self::new()
    }
}

impl English {
    /// Compiles the rule tables.
    pub fn new() -> Self {
        let mut rules: Vec<(String, String)> = SINGULAR_RULES
            .iter()
            .map(|(pattern, replacement)| (pattern.to_string(), replacement.to_string()))
            .collect();
        for (singular, plural) in IRREGULARS {
            rules.extend(irregular_rules(singular, plural));
        }

        let singulars = rules
            .into_iter()
            .rev()
            .filter_map(|(pattern, replacement)| {
                compile(&pattern).map(|regex| (regex, replacement))
            })
            .collect();
        let uncountables = UNCOUNTABLES
            .iter()
            .filter_map(|word| compile(&format!(r"(?i)\b{}$", regex::escape(word))))
            .collect();

        Self {
            singulars,
            uncountables,
        }
    }

    fn is_uncountable(&self, word: &str) -> bool {
        self.uncountables.iter().any(|regex| regex.is_match(word))
    }

    /// Upper-camel-cases a snake_case path: `"admin/blog_post"` becomes
    /// `"Admin::BlogPost"`.
    pub fn camelize(&self, word: &str) -> String {
        word.split('/')
            .map(|segment| segment.to_case(Case::Pascal))
            .collect::<Vec<_>>()
            .join("::")
    }
}

impl Inflector for English {
    fn singularize(&self, word: &str) -> String {
        if word.is_empty() || self.is_uncountable(word) {
            return word.to_string();
        }
        for (regex, replacement) in &self.singulars {
            if regex.is_match(word) {
                return regex.replace(word, replacement.as_str()).into_owned();
            }
        }
        word.to_string()
    }

    fn classify(&self, word: &str) -> String {
        // Drop any schema-style prefix: "public.users" -> "users".
        let trimmed = word.strip_suffix('.').unwrap_or(word);
        let name = trimmed.rsplit('.').next().unwrap_or(trimmed);
        self.camelize(&self.singularize(name))
    }
}

fn irregular_rules(singular: &str, plural: &str) -> Vec<(String, String)> {
    let mut s = singular.chars();
    let mut p = plural.chars();
    let (Some(s0), Some(p0)) = (s.next(), p.next()) else {
        return Vec::new();
    };
    let (s_rest, p_rest) = (s.as_str(), p.as_str());

    if s0.eq_ignore_ascii_case(&p0) {
        vec![
            (
                format!("(?i)({}){}$", p0, regex::escape(p_rest)),
                format!("${{1}}{}", s_rest),
            ),
            (
                format!("(?i)({}){}$", s0, regex::escape(s_rest)),
                format!("${{1}}{}", s_rest),
            ),
        ]
    } else {
        vec![(
            format!("(?i){}$", regex::escape(plural)),
            singular.to_string(),
        )]
    }
}

fn compile(pattern: &str) -> Option<Regex> {
    Regex::new(pattern)
        .map_err(|e| {
            tracing::error!("Skipping invalid inflection rule {:?}: {}", pattern, e);
        })
        .ok()
}
