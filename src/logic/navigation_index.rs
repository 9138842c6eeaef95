use crate::error::TemplateError;
use crate::model::{ActivityIndex, Manifest, TemplateDocument};

/// Supplies template documents by the filename listed in a manifest
#[async_trait::async_trait]
pub trait TemplateSource: Send + Sync {
    async fn fetch_template(&self, name: &str) -> Result<TemplateDocument, TemplateError>;
}

/// Upper-cased last three characters of a template filename
pub fn format_tag(filename: &str) -> String {
    let chars: Vec<char> = filename.chars().collect();
    let start = chars.len().saturating_sub(3);
    chars[start..].iter().collect::<String>().to_uppercase()
}

pub struct NavigationIndexBuilder;

impl NavigationIndexBuilder {
    /// Merge the activities of every template in `manifest` into one index.
    ///
    /// Templates are fetched one after another in manifest order. A template
    /// that fails to fetch or parse is skipped; a key seen again in a later
    /// template takes the later id.
    pub async fn build<T: TemplateSource + ?Sized>(manifest: &Manifest, source: &T) -> ActivityIndex {
        let mut index = ActivityIndex::new();

        for filename in &manifest.templates {
            let tag = format_tag(filename);

            let template = match source.fetch_template(filename).await {
                Ok(template) => template,
                Err(e) => {
                    log::warn!("skipping template {}: {}", filename, e);
                    continue;
                }
            };

            let mut written = 0usize;
            for activity in template.activities() {
                let key = format!("{}{}", activity.activity_name, tag);
                if let Some(previous) = index.insert(key, activity.activity_id.clone()) {
                    log::debug!(
                        "{}{} redefined by {} (was {})",
                        activity.activity_name,
                        tag,
                        filename,
                        previous
                    );
                }
                written += 1;
            }
            log::debug!("template {} contributed {} activities", filename, written);
        }

        index
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ActivityId;
    use parking_lot::Mutex;
    use std::collections::HashMap;

    /// Serves templates from JSON text; names without an entry fail with 404
    struct JsonTemplates {
        templates: HashMap<String, String>,
        requested: Mutex<Vec<String>>,
    }

    impl JsonTemplates {
        fn new(entries: &[(&str, &str)]) -> Self {
            Self {
                templates: entries
                    .iter()
                    .map(|(name, json)| (name.to_string(), json.to_string()))
                    .collect(),
                requested: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait::async_trait]
    impl TemplateSource for JsonTemplates {
        async fn fetch_template(&self, name: &str) -> Result<TemplateDocument, TemplateError> {
            self.requested.lock().push(name.to_string());
            let json = self.templates.get(name).ok_or(TemplateError::Status(404))?;
            Ok(serde_json::from_str(json)?)
        }
    }

    fn template(unit: &[(&str, &str)], topic: &[(&str, &str)]) -> String {
        let activities = |items: &[(&str, &str)]| {
            serde_json::Value::Array(
                items
                    .iter()
                    .map(|(name, id)| serde_json::json!({"activityName": name, "activityId": id}))
                    .collect(),
            )
        };
        serde_json::json!({
            "unitActivities": activities(unit),
            "modules": [{
                "moduleActivities": [],
                "topics": [{"topicActivities": activities(topic)}]
            }]
        })
        .to_string()
    }

    fn manifest(names: &[&str]) -> Manifest {
        Manifest {
            templates: names.iter().map(|n| n.to_string()).collect(),
        }
    }

    fn text(id: &str) -> ActivityId {
        ActivityId(serde_json::Value::from(id))
    }

    #[test]
    fn test_format_tag() {
        assert_eq!(format_tag("unit-template.pdf"), "PDF");
        assert_eq!(format_tag("teacherPpt"), "PPT");
        assert_eq!(format_tag("ab"), "AB");
        assert_eq!(format_tag(""), "");
    }

    #[tokio::test]
    async fn test_failed_template_is_skipped() {
        let first = template(&[("Welcome", "w1")], &[("Quiz", "q1")]);
        let third = template(&[("Wrap", "r3")], &[]);
        let source = JsonTemplates::new(&[("one.pdf", first.as_str()), ("three.doc", third.as_str())]);

        let index =
            NavigationIndexBuilder::build(&manifest(&["one.pdf", "two.ppt", "three.doc"]), &source)
                .await;

        assert_eq!(index.len(), 3);
        assert_eq!(index.get("WelcomePDF"), Some(&text("w1")));
        assert_eq!(index.get("QuizPDF"), Some(&text("q1")));
        assert_eq!(index.get("WrapDOC"), Some(&text("r3")));
        assert!(index.iter().all(|(key, _)| !key.ends_with("PPT")));
        assert_eq!(
            *source.requested.lock(),
            vec!["one.pdf", "two.ppt", "three.doc"]
        );
    }

    #[tokio::test]
    async fn test_malformed_template_is_skipped() {
        let good = template(&[("Intro", "i1")], &[]);
        let source = JsonTemplates::new(&[
            ("broken.pdf", r#"{"unitActivities": []}"#),
            ("good.pdf", good.as_str()),
        ]);

        let index =
            NavigationIndexBuilder::build(&manifest(&["broken.pdf", "good.pdf"]), &source).await;

        assert_eq!(index.len(), 1);
        assert_eq!(index.get("IntroPDF"), Some(&text("i1")));
    }

    #[tokio::test]
    async fn test_later_template_wins_on_key_collision() {
        let first = template(&[("Intro", "first")], &[]);
        let second = template(&[], &[("Intro", "second")]);
        let source = JsonTemplates::new(&[("a.pdf", first.as_str()), ("b.pdf", second.as_str())]);

        let index = NavigationIndexBuilder::build(&manifest(&["a.pdf", "b.pdf"]), &source).await;

        assert_eq!(index.len(), 1);
        assert_eq!(index.get("IntroPDF"), Some(&text("second")));
    }

    #[tokio::test]
    async fn test_numeric_ids_do_not_drop_the_template() {
        let source = JsonTemplates::new(&[(
            "unit.pdf",
            r#"{
                "unitActivities": [
                    {"activityName": "Quiz", "activityId": 12.5},
                    {"activityName": "Intro", "activityId": "i1"}
                ],
                "modules": []
            }"#,
        )]);

        let index = NavigationIndexBuilder::build(&manifest(&["unit.pdf"]), &source).await;

        assert_eq!(index.len(), 2);
        assert_eq!(index.get("QuizPDF"), Some(&ActivityId(serde_json::json!(12.5))));
        assert_eq!(index.get("IntroPDF"), Some(&text("i1")));
    }

    #[tokio::test]
    async fn test_all_failures_yield_empty_index() {
        let source = JsonTemplates::new(&[]);
        let index = NavigationIndexBuilder::build(&manifest(&["a.pdf", "b.pdf"]), &source).await;
        assert!(index.is_empty());
    }
}
