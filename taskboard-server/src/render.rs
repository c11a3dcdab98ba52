//! HTML rendering for Taskboard pages.
//!
//! All pages are built with `format!` into a shared layout. User-supplied
//! text (names, descriptions) is escaped before interpolation.

use taskboard_model::Task;

/// Escapes HTML-significant characters in user-supplied text.
#[must_use]
pub fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
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

/// Wraps page body markup in the shared document layout.
#[must_use]
pub fn layout(site_name: &str, title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <title>{title} - {site}</title>
</head>
<body>
    <header>
        <h1><a href="/tasks">{site}</a></h1>
    </header>
    <main>
{body}
    </main>
</body>
</html>"#,
        title = escape(title),
        site = escape(site_name),
        body = body,
    )
}

/// Renders the task list page, with a completed/total summary.
#[must_use]
pub fn task_list_page(site_name: &str, tasks: &[Task]) -> String {
    let completed = tasks.iter().filter(|t| t.is_complete()).count();

    let rows = if tasks.is_empty() {
        "        <p>No tasks yet.</p>".to_string()
    } else {
        let items: String = tasks.iter().map(task_row).collect();
        format!("        <ul class=\"tasks\">\n{items}        </ul>")
    };

    let body = format!(
        r#"        <h2>Tasks</h2>
        <p>{completed} of {total} complete</p>
{rows}
        <p><a href="/tasks/new">New task</a></p>"#,
        completed = completed,
        total = tasks.len(),
        rows = rows,
    );
    layout(site_name, "Tasks", &body)
}

/// Renders one list entry with show/toggle/delete controls.
fn task_row(task: &Task) -> String {
    let state = if task.is_complete() {
        "complete"
    } else {
        "incomplete"
    };
    let toggle_label = if task.is_complete() {
        "Mark incomplete"
    } else {
        "Mark complete"
    };
    format!(
        r#"            <li class="task {state}">
                <a href="/tasks/{id}">{name}</a>
                <form method="post" action="/tasks/{id}/complete">
                    <button type="submit">{toggle_label}</button>
                </form>
                <form method="post" action="/tasks/{id}">
                    <input type="hidden" name="_method" value="delete">
                    <button type="submit">Delete</button>
                </form>
            </li>
"#,
        state = state,
        id = task.id,
        name = escape(&task.name),
        toggle_label = toggle_label,
    )
}

/// Renders the task detail page.
#[must_use]
pub fn task_detail_page(site_name: &str, task: &Task) -> String {
    let completion = task
        .completion_date_rfc3339()
        .map_or_else(|| "Not completed".to_string(), |d| format!("Completed at {d}"));

    let body = format!(
        r#"        <h2>{name}</h2>
        <p>{description}</p>
        <p class="completion">{completion}</p>
        <p><a href="/tasks/{id}/edit">Edit</a> | <a href="/tasks">Back to list</a></p>"#,
        name = escape(&task.name),
        description = escape(&task.description),
        completion = completion,
        id = task.id,
    );
    layout(site_name, &task.name, &body)
}

/// Renders the empty creation form.
#[must_use]
pub fn new_task_page(site_name: &str) -> String {
    let body = format!(
        r#"        <h2>New task</h2>
{form}"#,
        form = task_form("/tasks", None, "", "", None),
    );
    layout(site_name, "New task", &body)
}

/// Renders the edit form pre-filled from an existing task.
#[must_use]
pub fn edit_task_page(site_name: &str, task: &Task) -> String {
    let body = format!(
        r#"        <h2>Edit task</h2>
{form}"#,
        form = task_form(
            &format!("/tasks/{}", task.id),
            Some("patch"),
            &task.name,
            &task.description,
            task.completion_date_input_value().as_deref(),
        ),
    );
    layout(site_name, "Edit task", &body)
}

/// Shared create/edit form markup. Fields are flat: `name`, `description`,
/// `completion_date` (a `datetime-local` input, empty while incomplete).
/// Browsers only submit GET and POST, so forms targeting a non-POST route
/// carry the verb in a hidden `_method` field.
fn task_form(
    action: &str,
    method_override: Option<&str>,
    name: &str,
    description: &str,
    completion_date: Option<&str>,
) -> String {
    let override_field = method_override.map_or_else(String::new, |m| {
        format!("\n            <input type=\"hidden\" name=\"_method\" value=\"{m}\">")
    });
    format!(
        r#"        <form method="post" action="{action}">{override_field}
            <label>Name <input type="text" name="name" value="{name}"></label>
            <label>Description <textarea name="description">{description}</textarea></label>
            <label>Completion date
                <input type="datetime-local" name="completion_date" value="{completion_date}">
            </label>
            <button type="submit">Save</button>
        </form>"#,
        action = action,
        name = escape(name),
        description = escape(description),
        completion_date = completion_date.map(escape).unwrap_or_default(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use taskboard_model::TaskId;
    use time::macros::datetime;

    fn task(name: &str, complete: bool) -> Task {
        Task {
            id: TaskId::new(1),
            name: name.to_string(),
            description: "a description".to_string(),
            completion_date: complete.then(|| datetime!(2024-05-01 10:30 UTC)),
        }
    }

    #[test]
    fn escape_covers_html_significant_characters() {
        assert_eq!(
            escape(r#"<b>"Tom & Jerry's"</b>"#),
            "&lt;b&gt;&quot;Tom &amp; Jerry&#39;s&quot;&lt;/b&gt;"
        );
        assert_eq!(escape("plain"), "plain");
    }

    #[test]
    fn list_page_shows_summary_and_links() {
        let tasks = vec![task("groceries", true), {
            let mut t = task("laundry", false);
            t.id = TaskId::new(2);
            t
        }];
        let html = task_list_page("Taskboard", &tasks);
        assert!(html.contains("1 of 2 complete"));
        assert!(html.contains(r#"<a href="/tasks/1">groceries</a>"#));
        assert!(html.contains(r#"<a href="/tasks/2">laundry</a>"#));
        assert!(html.contains(r#"href="/tasks/new""#));
    }

    #[test]
    fn list_row_forms_carry_postable_targets() {
        let html = task_list_page("Taskboard", &[task("groceries", false)]);
        // Toggle posts to the complete route directly.
        assert!(html.contains(r#"<form method="post" action="/tasks/1/complete">"#));
        // Delete posts to the task route with a method override.
        assert!(html.contains(r#"<form method="post" action="/tasks/1">"#));
        assert!(html.contains(r#"<input type="hidden" name="_method" value="delete">"#));
    }

    #[test]
    fn list_page_handles_empty_store() {
        let html = task_list_page("Taskboard", &[]);
        assert!(html.contains("No tasks yet."));
        assert!(html.contains("0 of 0 complete"));
    }

    #[test]
    fn detail_page_escapes_user_text() {
        let mut t = task("<script>alert(1)</script>", false);
        t.description = "a & b".to_string();
        let html = task_detail_page("Taskboard", &t);
        assert!(!html.contains("<script>alert(1)</script>"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains("a &amp; b"));
    }

    #[test]
    fn detail_page_reports_completion_state() {
        let html = task_detail_page("Taskboard", &task("done", true));
        assert!(html.contains("Completed at 2024-05-01T10:30:00Z"));

        let html = task_detail_page("Taskboard", &task("open", false));
        assert!(html.contains("Not completed"));
    }

    #[test]
    fn edit_form_is_prefilled() {
        let html = edit_task_page("Taskboard", &task("groceries", true));
        assert!(html.contains(r#"action="/tasks/1""#));
        assert!(html.contains(r#"<input type="hidden" name="_method" value="patch">"#));
        assert!(html.contains(r#"value="groceries""#));
        assert!(html.contains(">a description</textarea>"));
        assert!(html.contains(r#"value="2024-05-01T10:30""#));
    }

    #[test]
    fn new_form_is_empty() {
        let html = new_task_page("Taskboard");
        assert!(html.contains(r#"action="/tasks""#));
        assert!(html.contains(r#"name="completion_date" value="""#));
        // The create route really is POST; no override field.
        assert!(!html.contains("_method"));
    }

    #[test]
    fn layout_uses_site_name_in_title() {
        let html = layout("Team Tasks", "Tasks", "<p>body</p>");
        assert!(html.contains("<title>Tasks - Team Tasks</title>"));
    }
}
