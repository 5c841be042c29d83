use axohtml::{dom::DOMTree, elements::FlowContent, html, text, unsafe_text};
use std::{io, path::Path};
use thread_graph::Post;
use thread_ref::{LocalId, ThreadId};
use thread_view::{Badge, Ink, Paint, Row, Slot, ThreadView};
use tokio::fs::write;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Failed to write to file: {0}")]
    WriteFile(#[source] io::Error),
}

pub async fn write_thread_html(path: &Path, view: &ThreadView) -> Result<(), Error> {
    let page_html = render_thread(view);
    let page_bytes = page_html.to_string();

    write(path, page_bytes).await.map_err(Error::WriteFile)?;

    Ok(())
}

pub fn render_thread(view: &ThreadView) -> DOMTree<String> {
    let thread = view.thread();
    let thread_id = thread.id();
    let badge = view.badge().map(|badge| render_badge(&badge));

    // axohtml writes `_` in attribute names as `-`: these render as
    // `data-thread-id`, `data-random-mark` and `data-identity-scope`.
    html!(
        <div class="thread" data-thread_id={ thread_id.to_string() } data-random_mark={ thread.view_marker().to_string() } data-identity_scope={ thread.identity_scope() }>
            { badge }
            { view.rows().map(|(post, row)| render_post_row(thread_id, post, row)) }
        </div>
    )
}

pub fn render_post_row(thread_id: &ThreadId, post: &Post, row: &Row) -> Box<dyn FlowContent<String>> {
    let post_lid = post.local_id.to_string();

    if post.omission {
        return html!(
            <article class="post_row" data-post_lid={ post_lid } data-omission="true" style={ row_style(row) }>
                <div class="comment_body">
                    { unsafe_text!(post.comment.clone()) }
                </div>
            </article>
        );
    }

    let highlight = row.highlight();
    let target = post
        .reply_target
        .local_id()
        .map(|target| target.to_string())
        .unwrap_or_default();
    let indicator = match highlight.notifier() {
        Some(notifier) => (notifier.label(), "visibility: visible;"),
        None => ("", "visibility: hidden;"),
    };
    let body_style = match highlight.notifier() {
        Some(notifier) => format!("background-color: {};", notifier.background()),
        None => paint_style(highlight.visible(Slot::Body)),
    };
    let control_style = notifier_text_style(row);
    let pivot = if row.fold_mark().pivot { "true" } else { "" };

    html!(
        <article class="post_row" data-post_lid={ post_lid.clone() } data-post_gid={ post.global_id.to_string() } data-pivot={ pivot } style={ row_style(row) }>
            <div class="header_col" style={ control_style.clone() }>
                <aside class="post_header" data-user={ post.identity.to_string() } style={ paint_style(highlight.visible(Slot::Header)) }>
                    { text!("{}", post.marker.as_deref().unwrap_or_default()) }
                </aside>
                <a class="post_no" style={ paint_style(highlight.visible(Slot::PostNo)) }>
                    { text!("{}", post_lid) }
                </a>
                <a class="reply_target" data-target={ target.clone() } style={ paint_style(highlight.visible(Slot::ReplyTarget)) }>
                    { text!("{}", target) }
                </a>
                <a class="fold_posts" style={ control_style }>
                    { text!("{}", row.fold_mark().glyph()) }
                </a>
                <div class="action_indicator" style={ indicator.1 }>
                    { text!("{}", indicator.0) }
                </div>
            </div>
            <div class="comment_body" style={ body_style }>
                { unsafe_text!(post.comment.clone()) }
                { post.back_refs().iter().map(|reply| render_reply_link(thread_id, *reply)) }
            </div>
        </article>
    )
}

fn render_reply_link(thread_id: &ThreadId, reply: LocalId) -> Box<dyn FlowContent<String>> {
    html!(
        <a class="reply_link" href={ reply.to_page_url(thread_id) } data-reply={ reply.to_string() }>
            { text!("→{}", reply) }
        </a>
    )
}

fn render_badge(badge: &Badge) -> Box<dyn FlowContent<String>> {
    let style = format!("color: {}; visibility: visible;", badge.color);

    html!(
        <span class="user_han" style={ style }>
            { text!("{}", badge.marker.as_deref().unwrap_or_default()) }
        </span>
    )
}

pub fn paint_style(paint: Paint) -> String {
    let ink = match paint.ink {
        Ink::Inherit => None,
        Ink::Black => Some("black"),
    };
    match (paint.background, ink) {
        (Some(background), Some(ink)) => format!("background-color: {}; color: {};", background, ink),
        (Some(background), None) => format!("background-color: {};", background),
        (None, Some(ink)) => format!("color: {};", ink),
        (None, None) => String::new(),
    }
}

/// Text color the header column and fold control take while a notifier
/// shows.
pub fn notifier_text_style(row: &Row) -> String {
    match row.highlight().notifier() {
        Some(notifier) => format!("color: {};", notifier.text_color()),
        None => String::new(),
    }
}

pub fn row_style(row: &Row) -> String {
    let mut style = String::new();
    if row.is_hidden() {
        style.push_str("display: none;");
    }
    if let Some(notifier) = row.highlight().notifier() {
        style.push_str(&format!("background-color: {};", notifier.background()));
    }
    style
}
