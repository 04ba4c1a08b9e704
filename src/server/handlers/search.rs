use std::fmt::Write;
use std::sync::Arc;

use axum::extract::State;
use axum::response::Html;
use axum::Form;
use serde::Deserialize;

use crate::errors::ApiError;
use crate::search::RenderedResult;
use crate::server::handlers::escape_html;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SearchForm {
    #[serde(default)]
    pub q: String,
}

pub async fn search_form() -> Html<&'static str> {
    Html(
        r#"<html>
<body>
    <form action="/search" method="post">
        <input type="text" name="q" placeholder="Search..." />
        <input type="submit" value="Search" />
    </form>
</body>
</html>"#,
    )
}

pub async fn run_search(
    State(state): State<Arc<AppState>>,
    Form(form): Form<SearchForm>,
) -> Result<Html<String>, ApiError> {
    let results = state.search.search(&form.q).await?;
    Ok(Html(results_page(&form.q, &results)))
}

fn results_page(query: &str, results: &[RenderedResult]) -> String {
    let mut listing = String::from("<ol>");
    for result in results {
        // write! to a String cannot fail
        let _ = write!(
            listing,
            concat!(
                r#"<li>{score}: <a href="{url}">{label}</a>{synopsis}"#,
                r#"<form action="/cache" method="POST">"#,
                r#"<input type="hidden" name="id" value="{url}">"#,
                r#"<input type="submit" value="Cached">"#,
                "</form></li>"
            ),
            score = result.display_score(),
            url = escape_html(&result.id),
            label = escape_html(result.label()),
            synopsis = synopsis(result),
        );
    }
    listing.push_str("</ol>");

    format!(
        "<html>\n<body>\n    <h1>Search Results for: {}</h1>\n    {}\n</body>\n</html>",
        escape_html(query),
        listing
    )
}

fn synopsis(result: &RenderedResult) -> String {
    match &result.description {
        Some(description) => format!("<p>{}</p>", escape_html(description)),
        None => "<br>".to_string(),
    }
}
