//! Skill canonicalization. An immutable, loaded-once lookup injected into the
//! resume worker and the scoring engine, so tests can supply their own table
//! instead of reaching into a process-wide global.

use std::collections::HashMap;
use std::sync::Arc;

/// Case-folds, deduplicates, and maps aliases to canonical skill names.
#[derive(Debug, Clone)]
pub struct SkillNormalizer {
    aliases: Arc<HashMap<String, String>>,
}

impl SkillNormalizer {
    /// Build from explicit (alias, canonical) pairs. Aliases are matched
    /// case-insensitively.
    pub fn new(pairs: &[(&str, &str)]) -> Self {
        let aliases = pairs
            .iter()
            .map(|(alias, canonical)| (alias.to_lowercase(), canonical.to_lowercase()))
            .collect();
        Self {
            aliases: Arc::new(aliases),
        }
    }

    /// The default table covering the aliases seen most often in resumes.
    pub fn with_defaults() -> Self {
        Self::new(&[
            ("js", "javascript"),
            ("ecmascript", "javascript"),
            ("node", "node.js"),
            ("nodejs", "node.js"),
            ("ts", "typescript"),
            ("py", "python"),
            ("golang", "go"),
            ("k8s", "kubernetes"),
            ("postgres", "postgresql"),
            ("psql", "postgresql"),
            ("react.js", "react"),
            ("reactjs", "react"),
            ("vue.js", "vue"),
            ("vuejs", "vue"),
            ("angular.js", "angular"),
            ("angularjs", "angular"),
            ("gcp", "google cloud"),
            ("aws", "amazon web services"),
            ("ml", "machine learning"),
            ("ai", "artificial intelligence"),
            ("ci/cd", "continuous integration"),
            ("scrum", "agile"),
        ])
    }

    /// Canonical lowercase form of a single skill.
    pub fn canonicalize(&self, skill: &str) -> String {
        let folded = skill.trim().to_lowercase();
        self.aliases.get(&folded).cloned().unwrap_or(folded)
    }

    /// Canonicalize a whole list, dropping empties and duplicates while
    /// preserving first-seen order.
    pub fn normalize_all(&self, skills: &[String]) -> Vec<String> {
        let mut seen = std::collections::HashSet::new();
        skills
            .iter()
            .map(|s| self.canonicalize(s))
            .filter(|s| !s.is_empty() && seen.insert(s.clone()))
            .collect()
    }
}

impl Default for SkillNormalizer {
    fn default() -> Self {
        Self::with_defaults()
    }
}
