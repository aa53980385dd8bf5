//! Server-side HTML views.
//!
//! Templates live in `templates/` and are compiled into the binary. They are
//! registered under `.html` names, so minijinja HTML-escapes every
//! interpolated value.

use chrono::DateTime;
use minijinja::{Environment, Value, context};
use roster_core::ServiceError;

use crate::model::Student;

const TEMPLATES: &[(&str, &str)] = &[
    ("layout.html", include_str!("../templates/layout.html")),
    ("_form.html", include_str!("../templates/_form.html")),
    ("index.html", include_str!("../templates/index.html")),
    ("new.html", include_str!("../templates/new.html")),
    ("show.html", include_str!("../templates/show.html")),
    ("edit.html", include_str!("../templates/edit.html")),
];

pub struct Views {
    env: Environment<'static>,
}

impl Views {
    pub fn new() -> Result<Self, ServiceError> {
        let mut env = Environment::new();
        for &(name, source) in TEMPLATES {
            env.add_template(name, source).map_err(template_err)?;
        }
        env.add_filter("datetime", format_datetime);
        Ok(Self { env })
    }

    /// The student list, newest first as given.
    pub fn list(&self, students: &[Student]) -> Result<String, ServiceError> {
        self.render("index.html", context! { students => students })
    }

    pub fn new_form(&self) -> Result<String, ServiceError> {
        self.render("new.html", context! {})
    }

    pub fn show(&self, student: &Student) -> Result<String, ServiceError> {
        self.render("show.html", context! { student => student })
    }

    pub fn edit_form(&self, student: &Student) -> Result<String, ServiceError> {
        self.render("edit.html", context! { student => student })
    }

    fn render(&self, name: &str, ctx: Value) -> Result<String, ServiceError> {
        self.env
            .get_template(name)
            .and_then(|tmpl| tmpl.render(ctx))
            .map_err(template_err)
    }
}

fn template_err(e: minijinja::Error) -> ServiceError {
    ServiceError::Internal(format!("template: {e}"))
}

/// `{{ ts | datetime }}` — RFC 3339 timestamp to `YYYY-MM-DD HH:MM UTC`.
/// Unparseable input is printed unchanged.
fn format_datetime(value: String) -> String {
    DateTime::parse_from_rfc3339(&value)
        .map(|ts| ts.format("%Y-%m-%d %H:%M UTC").to_string())
        .unwrap_or(value)
}
