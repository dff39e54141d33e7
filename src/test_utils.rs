//! Assertions for rendered pages and HTMX responses.

use axum::{
    body::{Body, to_bytes},
    http::header::CONTENT_TYPE,
    response::Response,
};
use scraper::{ElementRef, Html, Selector};

async fn body_text(response: Response<Body>) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Could not read response body");

    String::from_utf8(bytes.to_vec()).expect("Response body is not UTF-8")
}

pub(crate) async fn parse_html_document(response: Response<Body>) -> Html {
    Html::parse_document(&body_text(response).await)
}

pub(crate) async fn parse_html_fragment(response: Response<Body>) -> Html {
    Html::parse_fragment(&body_text(response).await)
}

#[track_caller]
pub(crate) fn assert_valid_html(html: &Html) {
    assert!(html.errors.is_empty(), "HTML parse errors: {:?}", html.errors);
}

#[track_caller]
pub(crate) fn assert_content_type(response: &Response<Body>, want: &str) {
    assert_eq!(
        response.headers().get(CONTENT_TYPE).map(|value| value.as_bytes()),
        Some(want.as_bytes())
    );
}

#[track_caller]
pub(crate) fn assert_hx_redirect(response: &Response<Body>, want: &str) {
    let location = response
        .headers()
        .get("hx-redirect")
        .expect("No HX-Redirect header");

    assert_eq!(location, want);
}

/// The first element matching `selector`, panicking if there is none.
#[track_caller]
pub(crate) fn must_select<'a>(html: &'a Html, selector: &str) -> ElementRef<'a> {
    html.select(&Selector::parse(selector).unwrap())
        .next()
        .unwrap_or_else(|| panic!("Nothing matches {selector}"))
}

/// The trimmed text of every element matching `selector`.
pub(crate) fn select_text(html: &Html, selector: &str) -> Vec<String> {
    html.select(&Selector::parse(selector).unwrap())
        .map(|element| element.text().collect::<String>().trim().to_owned())
        .collect()
}

/// The headline of the alert swapped into `#alert-container`.
#[track_caller]
pub(crate) fn assert_alert_message(html: &Html, want: &str) {
    let headline = must_select(html, "#alert-container [data-alert-message]")
        .text()
        .collect::<String>();

    assert_eq!(headline.trim(), want);
}
