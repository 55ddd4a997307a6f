//! HTML renderers for every node kind.
//!
//! Text reaching a renderer has already been escaped by the last pass;
//! attribute values are escaped here.

use super::ConvertOptions;
use crate::codec::{base64_encode, data_uri, encode_uri_component, is_image_mime};
use crate::model::{Hyperlink, InlineHyperlink, InlineImage, Node, NodeKind, Quote, UueAttachment};
use crate::passes::{escape_entities, escape_text};
use crate::pipeline::{Pipeline, RenderContext};

/// 1×1 transparent GIF used as `src` of images in data mode.
pub const PLACEHOLDER_GIF: &str =
    "data:image/gif;base64,R0lGODlhAQABAIAAAP///wAAACH5BAEAAAAALAAAAAABAAEAAAICRAEAOw==";

/// Register the HTML renderers. Plain text has no renderer and passes
/// through.
pub fn register_renderers(pipeline: &mut Pipeline) {
    pipeline.register_renderer(&[NodeKind::Hyperlink], |node, ctx| match node {
        Node::Hyperlink(link) => render_hyperlink(link, ctx),
        _ => String::new(),
    });
    pipeline.register_renderer(&[NodeKind::InlineHyperlink], |node, ctx| match node {
        Node::InlineHyperlink(link) => render_inline_link(link, ctx),
        _ => String::new(),
    });
    pipeline.register_renderer(&[NodeKind::Video], |node, ctx| match node {
        Node::Video(video) => render_video(video, ctx),
        _ => String::new(),
    });
    pipeline.register_renderer(&[NodeKind::InlineImage], |node, ctx| match node {
        Node::InlineImage(image) => render_image(image, ctx.options()),
        _ => String::new(),
    });
    pipeline.register_renderer(&[NodeKind::Uue], |node, ctx| match node {
        Node::Uue(uue) => render_attachment(uue, ctx.options()),
        _ => String::new(),
    });
    pipeline.register_renderer(&[NodeKind::Quote], |node, ctx| match node {
        Node::Quote(quote) => render_quote(quote, ctx),
        _ => String::new(),
    });
    pipeline.register_renderer(&[NodeKind::Origin], render_origin);
    pipeline.register_renderer(&[NodeKind::Tearline, NodeKind::Tagline], render_signature);
    pipeline.register_renderer(&[NodeKind::Monospace], |node, ctx| match node {
        Node::Monospace(block) => format!(
            "<div class=\"monospaceBlock\"><code>{}</code></div>",
            ctx.render(&block.content)
        ),
        _ => String::new(),
    });
}

/// Escape a value for a double-quoted attribute.
pub fn escape_attr(value: &str) -> String {
    escape_entities(value)
}

fn href(options: &ConvertOptions, scheme: &str, url: &str) -> String {
    escape_attr(&format!("{}{}", options.url_prefix(scheme, url), url))
}

fn title_attr(title: Option<&str>) -> String {
    title
        .map(|t| format!(" title=\"{}\"", escape_attr(t)))
        .unwrap_or_default()
}

fn anchor_open(options: &ConvertOptions, scheme: &str, url: &str, title: Option<&str>) -> String {
    let href = href(options, scheme, url);
    if options.data_mode {
        format!(
            "<a href=\"javascript:;\" data-href=\"{}\"{}>",
            href,
            title_attr(title)
        )
    } else {
        format!("<a href=\"{}\"{}>", href, title_attr(title))
    }
}

fn render_hyperlink(link: &Hyperlink, ctx: &RenderContext<'_>) -> String {
    format!(
        "{}{}</a>",
        anchor_open(ctx.options(), &link.scheme, &link.url, None),
        link.display_text
    )
}

fn render_inline_link(link: &InlineHyperlink, ctx: &RenderContext<'_>) -> String {
    format!(
        "{}{}</a>",
        anchor_open(ctx.options(), &link.scheme, &link.url, link.title.as_deref()),
        ctx.render(&link.link_text)
    )
}

fn render_video(video: &InlineHyperlink, ctx: &RenderContext<'_>) -> String {
    format!(
        "<video controls src=\"{}\"{}>{}</video>",
        href(ctx.options(), &video.scheme, &video.url),
        title_attr(video.title.as_deref()),
        ctx.render(&video.link_text)
    )
}

fn render_image(image: &InlineImage, options: &ConvertOptions) -> String {
    let src = href(options, &image.scheme, &image.url);
    let source = if options.data_mode {
        format!("src=\"{}\" data-src=\"{}\"", PLACEHOLDER_GIF, src)
    } else {
        format!("src=\"{}\"", src)
    };
    format!(
        "<img {} alt=\"{}\"{}>",
        source,
        escape_attr(&image.alt_text),
        title_attr(image.title.as_deref())
    )
}

fn attachment_url(uue: &UueAttachment, options: &ConvertOptions) -> String {
    match &options.file_url_parts {
        Some((prefix, suffix)) => {
            format!("{}{}{}", prefix, encode_uri_component(&uue.name), suffix)
        }
        None => data_uri(&uue.mime_hint, &uue.data),
    }
}

fn render_attachment(uue: &UueAttachment, options: &ConvertOptions) -> String {
    let name = escape_attr(&uue.name);
    if is_image_mime(&uue.mime_hint) {
        let source = if options.data_mode {
            format!(" data-source=\"{}\"", base64_encode(uue.source.as_bytes()))
        } else {
            String::new()
        };
        return format!(
            "<div class=\"imageUUE\" data-name=\"{}\"{}><img src=\"{}\"></div>",
            name,
            source,
            escape_attr(&attachment_url(uue, options))
        );
    }

    let raw = escape_text(&uue.source);
    if options.data_mode {
        format!(
            "<div class=\"fileUUE\" data-name=\"{}\" data-content=\"{}\">{}</div>",
            name,
            base64_encode(&uue.data),
            raw
        )
    } else {
        format!(
            "<div class=\"linkUUE\"><a href=\"{}\">{}</a></div>",
            escape_attr(&attachment_url(uue, options)),
            raw
        )
    }
}

fn render_quote(quote: &Quote, ctx: &RenderContext<'_>) -> String {
    let level = quote.level.max(1);
    let mut html = "<blockquote class=\"fidoQuoteOuter\">".repeat(level - 1);
    if ctx.options().data_mode {
        html.push_str(&format!(
            "<blockquote data-authorID=\"{}\" data-quoteLevel=\"{}\" class=\"fidoQuote\">",
            escape_attr(&quote.author_id),
            level
        ));
    } else {
        html.push_str("<blockquote class=\"fidoQuote\">");
    }
    html.push_str(&ctx.render(&quote.quoted_text));
    html.push_str(&"</blockquote>".repeat(level));
    html
}

fn font_wrap(options: &ConvertOptions, color: &str, inner: String) -> String {
    if options.font_color {
        format!("<font color=\"{}\">{}</font>", escape_attr(color), inner)
    } else {
        inner
    }
}

fn render_origin(node: &Node, ctx: &RenderContext<'_>) -> String {
    let Node::Origin(origin) = node else {
        return String::new();
    };
    let options = ctx.options();
    let inner = format!(
        "{}(<span data-addr=\"{}\">{}</span>)",
        ctx.render(&origin.preamble),
        escape_attr(&origin.raw_address),
        ctx.render(&origin.address)
    );
    format!(
        "<div class=\"originLine\">{}</div>",
        font_wrap(options, &options.colors.origin, inner)
    )
}

fn render_signature(node: &Node, ctx: &RenderContext<'_>) -> String {
    let options = ctx.options();
    let (class, color, line) = match node {
        Node::Tearline(line) => ("tearline", &options.colors.tearline, line),
        Node::Tagline(line) => ("tagline", &options.colors.tagline, line),
        _ => return String::new(),
    };
    format!(
        "<div class=\"{}\">{}</div>",
        class,
        font_wrap(options, color, ctx.render(&line.content))
    )
}
