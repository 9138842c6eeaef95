use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// `navigation.json`: the templates that together describe one unit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    pub templates: Vec<String>,
}

/// One template document: unit → modules → topics, each level carrying activities
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateDocument {
    pub unit_activities: Vec<Activity>,
    pub modules: Vec<Module>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Module {
    pub module_activities: Vec<Activity>,
    pub topics: Vec<Topic>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Topic {
    pub topic_activities: Vec<Activity>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub activity_name: String,
    pub activity_id: ActivityId,
}

/// Activity identifier, kept as whatever JSON value the template author wrote
/// (string, integer, fraction, ...) and echoed back untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActivityId(pub Value);

impl fmt::Display for ActivityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Value::String(s) => f.write_str(s),
            other => write!(f, "{}", other),
        }
    }
}

impl TemplateDocument {
    /// Every activity in document order: unit level, then each module's own
    /// activities followed by its topics' activities.
    pub fn activities(&self) -> impl Iterator<Item = &Activity> + '_ {
        self.unit_activities.iter().chain(self.modules.iter().flat_map(|module| {
            module
                .module_activities
                .iter()
                .chain(module.topics.iter().flat_map(|topic| topic.topic_activities.iter()))
        }))
    }
}

/// Flat lookup of `activityName + formatTag` → activity id
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActivityIndex {
    entries: BTreeMap<String, ActivityId>,
}

impl ActivityIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Later writes to the same key win
    pub fn insert(&mut self, key: String, id: ActivityId) -> Option<ActivityId> {
        self.entries.insert(key, id)
    }

    pub fn get(&self, key: &str) -> Option<&ActivityId> {
        self.entries.get(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &ActivityId)> {
        self.entries.iter()
    }
}
