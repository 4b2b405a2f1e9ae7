use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use reqwest::blocking::{Client, Response, multipart};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A stored resource as returned by the server.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub file_name: String,
    pub file_url: String,
    pub file_type: String,
    pub category: String,
    pub course: Option<String>,
    pub specialization: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Specialization {
    pub id: i64,
    pub name: String,
    pub course_id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Course {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub specializations: Vec<Specialization>,
}

/// Filters for `GET /api/resources`. `None` fields are not sent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchParams {
    pub query: Option<String>,
    pub category: Option<String>,
    pub course: Option<String>,
    pub specialization: Option<String>,
}

impl SearchParams {
    fn pairs(&self) -> Vec<(&'static str, &str)> {
        [
            ("q", &self.query),
            ("category", &self.category),
            ("course", &self.course),
            ("specialization", &self.specialization),
        ]
        .into_iter()
        .filter_map(|(key, value)| value.as_deref().map(|v| (key, v)))
        .collect()
    }
}

/// Text fields of an upload; the file is passed separately.
#[derive(Debug, Clone, Default)]
pub struct UploadFields {
    pub title: String,
    pub description: Option<String>,
    pub category: String,
    pub course: Option<String>,
    pub specialization: Option<String>,
}

#[derive(Deserialize)]
struct UploadReply {
    resource: Resource,
}

/// Blocking client for the library HTTP API.
#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    http: Client,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api{}", self.base_url, path)
    }

    pub fn search(&self, params: &SearchParams) -> Result<Vec<Resource>> {
        let res = self
            .http
            .get(self.url("/resources"))
            .query(&params.pairs())
            .send()
            .with_context(|| format!("Failed to reach {}", self.base_url))?;
        parse(res)
    }

    pub fn categories(&self) -> Result<Vec<String>> {
        let res = self
            .http
            .get(self.url("/resources/categories"))
            .send()
            .with_context(|| format!("Failed to reach {}", self.base_url))?;
        parse(res)
    }

    pub fn upload(&self, file: &Path, mime: &str, fields: &UploadFields) -> Result<Resource> {
        let file_name = file
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("upload")
            .to_string();
        let bytes =
            std::fs::read(file).with_context(|| format!("Failed to read {}", file.display()))?;
        let part = multipart::Part::bytes(bytes)
            .file_name(file_name)
            .mime_str(mime)?;

        let mut form = multipart::Form::new()
            .text("title", fields.title.clone())
            .text("category", fields.category.clone())
            .part("file", part);
        for (name, value) in [
            ("description", &fields.description),
            ("course", &fields.course),
            ("specialization", &fields.specialization),
        ] {
            if let Some(value) = value {
                form = form.text(name, value.clone());
            }
        }

        let res = self
            .http
            .post(self.url("/upload"))
            .multipart(form)
            .send()
            .with_context(|| format!("Failed to reach {}", self.base_url))?;
        let reply: UploadReply = parse(res)?;
        Ok(reply.resource)
    }

    pub fn courses(&self) -> Result<Vec<Course>> {
        let res = self
            .http
            .get(self.url("/courses"))
            .send()
            .with_context(|| format!("Failed to reach {}", self.base_url))?;
        parse(res)
    }

    pub fn add_course(&self, name: &str) -> Result<Course> {
        self.post_taxonomy(serde_json::json!({ "type": "course", "name": name }))
    }

    pub fn add_specialization(&self, course_id: i64, name: &str) -> Result<Specialization> {
        self.post_taxonomy(serde_json::json!({
            "type": "specialization",
            "name": name,
            "courseId": course_id,
        }))
    }

    fn post_taxonomy<T: for<'de> Deserialize<'de>>(&self, body: Value) -> Result<T> {
        let res = self
            .http
            .post(self.url("/courses"))
            .json(&body)
            .send()
            .with_context(|| format!("Failed to reach {}", self.base_url))?;
        parse(res)
    }
}

/// Decode a success body, or turn the server's error envelope into a message.
fn parse<T: for<'de> Deserialize<'de>>(res: Response) -> Result<T> {
    let status = res.status();
    if status.is_success() {
        return res.json().context("Unexpected response body");
    }

    let body: Value = res.json().unwrap_or(Value::Null);
    bail!("{}", describe_error(status.as_u16(), &body))
}

fn describe_error(status: u16, body: &Value) -> String {
    let error = body["error"].as_str().unwrap_or("request failed");
    let mut message = format!("{error} (HTTP {status})");

    if let Some(fields) = body["details"].as_object() {
        for (field, problems) in fields {
            for problem in problems.as_array().into_iter().flatten() {
                if let Some(text) = problem.as_str() {
                    message.push_str(&format!("\n  {field}: {text}"));
                }
            }
        }
    } else if let Some(detail) = body["message"].as_str() {
        message.push_str(&format!(": {detail}"));
    }

    message
}
