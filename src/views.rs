//! Server-rendered pages.
//!
//! Every page is a complete HTML document built on `layout`. Anything that came
//! from a client or the store goes through `escape` before it is interpolated.

use crate::schema::ValidationErrors;
use crate::types::{Major, StudentRecord};
use std::fmt::Write;

pub fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn layout(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{title}</title>
</head>
<body>
<nav><a href="/students">All students</a> | <a href="/students/new">Add a student</a></nav>
<main>
{body}
</main>
</body>
</html>
"#,
        title = escape(title),
        body = body
    )
}

fn record_table(record: &StudentRecord) -> String {
    format!(
        r#"<table>
<tr><th>ID</th><td>{id}</td></tr>
<tr><th>Name</th><td>{name}</td></tr>
<tr><th>Age</th><td>{age}</td></tr>
<tr><th>Major</th><td>{major}</td></tr>
<tr><th>Merit scholarship</th><td>{merit}</td></tr>
<tr><th>Other scholarship</th><td>{other}</td></tr>
</table>"#,
        id = record.id.to_hex(),
        name = escape(&record.name),
        age = record.age,
        major = escape(record.major.as_str()),
        merit = record.scholarship.merit,
        other = record.scholarship.other,
    )
}

/// Field values shown in a form; empty for the blank creation form.
struct FormValues<'a> {
    name: &'a str,
    age: String,
    major: Option<Major>,
    merit: String,
    other: String,
}

fn student_form(action: &str, submit: &str, values: &FormValues<'_>) -> String {
    let mut options = String::new();
    for major in Major::ALL {
        let selected = if values.major == Some(major) {
            " selected"
        } else {
            ""
        };
        let _ = writeln!(
            options,
            r#"<option value="{value}"{selected}>{value}</option>"#,
            value = escape(major.as_str()),
            selected = selected
        );
    }

    format!(
        r#"<form action="{action}" method="POST">
<label>Name <input type="text" name="name" value="{name}" required minlength="2"></label>
<label>Age <input type="number" name="age" value="{age}" min="0" step="1"></label>
<label>Major <select name="major" required>
<option value="">Choose a major</option>
{options}</select></label>
<label>Merit scholarship <input type="number" name="merit" value="{merit}" min="0" max="5000"></label>
<label>Other scholarship <input type="number" name="other" value="{other}" min="0"></label>
<button type="submit">{submit}</button>
</form>"#,
        action = escape(action),
        name = escape(values.name),
        age = escape(&values.age),
        options = options,
        merit = escape(&values.merit),
        other = escape(&values.other),
        submit = escape(submit),
    )
}

pub fn students_page(records: &[StudentRecord]) -> String {
    let mut body = String::from("<h1>Students</h1>\n");
    if records.is_empty() {
        body.push_str("<p>No students yet.</p>\n");
    } else {
        body.push_str("<ul>\n");
        for record in records {
            let _ = writeln!(
                body,
                r#"<li><a href="/students/{id}">{name}</a> ({major})</li>"#,
                id = record.id.to_hex(),
                name = escape(&record.name),
                major = escape(record.major.as_str()),
            );
        }
        body.push_str("</ul>\n");
    }
    layout("Students", &body)
}

pub fn new_student_form() -> String {
    let values = FormValues {
        name: "",
        age: String::new(),
        major: None,
        merit: String::new(),
        other: String::new(),
    };
    let body = format!(
        "<h1>Add a student</h1>\n{}",
        student_form("/students", "Create", &values)
    );
    layout("Add a student", &body)
}

pub fn student_created(record: &StudentRecord) -> String {
    let body = format!(
        "<h1>Student saved</h1>\n{}\n<p><a href=\"/students/{}\">View record</a></p>",
        record_table(record),
        record.id.to_hex()
    );
    layout("Student saved", &body)
}

pub fn student_save_failed(errors: &ValidationErrors) -> String {
    let mut body = String::from("<h1>Student could not be saved</h1>\n<ul>\n");
    for violation in &errors.violations {
        let _ = writeln!(
            body,
            "<li><strong>{}</strong>: {}</li>",
            escape(violation.path),
            escape(&violation.message)
        );
    }
    body.push_str("</ul>\n<p><a href=\"/students/new\">Try again</a></p>");
    layout("Save failed", &body)
}

pub fn student_page(record: &StudentRecord) -> String {
    let id = record.id.to_hex();
    let body = format!(
        r#"<h1>{name}</h1>
{table}
<p><a href="/students/{id}/edit">Edit</a></p>
<form action="/students/{id}?_method=DELETE" method="POST">
<button type="submit">Delete</button>
</form>"#,
        name = escape(&record.name),
        table = record_table(record),
        id = id,
    );
    layout(&record.name, &body)
}

pub fn student_edit_form(record: &StudentRecord) -> String {
    let values = FormValues {
        name: &record.name,
        age: record.age.to_string(),
        major: Some(record.major),
        merit: record.scholarship.merit.to_string(),
        other: record.scholarship.other.to_string(),
    };
    let action = format!("/students/{}?_method=PUT", record.id.to_hex());
    let body = format!(
        "<h1>Edit {}</h1>\n<p>Every field is replaced; leave values in place to keep them.</p>\n{}",
        escape(&record.name),
        student_form(&action, "Save", &values)
    );
    layout("Edit student", &body)
}

pub fn student_updated(record: &StudentRecord) -> String {
    let body = format!("<h1>Student updated</h1>\n{}", record_table(record));
    layout("Student updated", &body)
}

pub fn student_deleted() -> String {
    layout(
        "Student deleted",
        "<h1>Student deleted</h1>\n<p><a href=\"/students\">Back to all students</a></p>",
    )
}

pub fn student_not_found(id: &str) -> String {
    let body = format!(
        "<h1>Student not found</h1>\n<p>No student has the id <code>{}</code>.</p>",
        escape(id)
    );
    layout("Student not found", &body)
}

pub fn error_page(message: &str) -> String {
    let body = format!(
        "<h1>Something went wrong</h1>\n<pre>{}</pre>",
        escape(message)
    );
    layout("Error", &body)
}
