use chrono::{DateTime, Utc};

use crate::models::follow::Follow;

use super::{http_date, parse_timestamp};

/// Render the canonical follow sequence as a complete RSS 2.0 document.
///
/// `last_modified` (an HTTP-date, typically from the feed signature) becomes
/// the channel's `lastBuildDate`; `now` backs the fallback paths for items
/// without a parsable upload time, so callers can pin it in tests.
pub fn render_feed(
    canonical: &[Follow],
    user_id: &str,
    base_url: &str,
    last_modified: Option<&str>,
    now: DateTime<Utc>,
) -> String {
    let items: String = canonical.iter().map(|f| render_item(f, now)).collect();
    let last_build = last_modified
        .map(str::to_string)
        .unwrap_or_else(|| http_date(now));
    let self_link = format!("{}/feed/{}", base_url, user_id);

    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0" xmlns:atom="http://www.w3.org/2005/Atom">
  <channel>
    <title>Comick.io Follows - Latest Updates</title>
    <description>Latest chapter updates from your followed comics on Comick.io</description>
    <link>https://comick.io/user/{user_link}/list</link>
    <atom:link href="{self_link}" rel="self" type="application/rss+xml"/>
    <language>en-us</language>
    <ttl>5</ttl>
    <lastBuildDate>{last_build}</lastBuildDate>
    <generator>Comick RSS Generator</generator>
    <image>
      <title>Comick.io</title>
      <url>https://comick.io/favicon.ico</url>
      <link>https://comick.io</link>
    </image>
{items}  </channel>
</rss>"#,
        user_link = escape_xml(user_id),
        self_link = escape_xml(&self_link),
        last_build = last_build,
        items = items,
    )
}

fn render_item(follow: &Follow, now: DateTime<Utc>) -> String {
    let comic = follow.comic();

    let cover_image = comic.and_then(|c| c.cover_url());
    let raw_title = comic
        .and_then(|c| c.title.as_deref())
        .unwrap_or("Untitled");
    let chapter_number = follow.chapter_number();

    let title_text = match chapter_number {
        Some(chap) => format!("{} - Chapter {}", raw_title, chap),
        None => raw_title.to_string(),
    };

    let link = format!(
        "https://comick.io/comic/{}",
        escape_xml(comic.and_then(|c| c.slug.as_deref()).unwrap_or(""))
    );
    let pub_date = comic
        .and_then(|c| c.uploaded_at.as_deref())
        .and_then(parse_timestamp)
        .map(http_date)
        .unwrap_or_else(|| http_date(now));
    let guid = format!(
        "comick-{}-{}",
        comic
            .and_then(|c| c.id)
            .map(|id| id.to_string())
            .unwrap_or_else(|| "unknown".to_string()),
        comic
            .and_then(|c| c.last_chapter.as_ref())
            .map(|lc| lc.to_string())
            .unwrap_or_else(|| "na".to_string()),
    );

    let description = render_description(follow, cover_image.as_deref());

    let enclosure = cover_image
        .as_deref()
        .map(|url| {
            format!(
                "      <enclosure url=\"{}\" type=\"image/jpeg\"/>\n",
                escape_xml(url)
            )
        })
        .unwrap_or_default();

    format!(
        "    <item>\n      <title><![CDATA[{title}]]></title>\n      <description><![CDATA[{description}]]></description>\n      <link>{link}</link>\n      <guid isPermaLink=\"false\"><![CDATA[{guid}]]></guid>\n      <pubDate>{pub_date}</pubDate>\n{enclosure}    </item>\n",
        title = escape_cdata(&title_text),
        description = escape_cdata(&description),
        link = link,
        guid = escape_cdata(&guid),
        pub_date = pub_date,
        enclosure = enclosure,
    )
}

/// HTML fragment for the item description. Values are XML-escaped before
/// being wrapped in CDATA so the fragment stays inert in readers that strip
/// the CDATA wrapper.
fn render_description(follow: &Follow, cover_image: Option<&str>) -> String {
    let comic = follow.comic();
    let comic_title = escape_xml(comic.and_then(|c| c.title.as_deref()).unwrap_or("Untitled"));
    let status = comic.and_then(|c| c.status).unwrap_or(0);
    let last_chapter = comic
        .and_then(|c| c.last_chapter.as_ref())
        .map(|lc| escape_xml(&lc.to_string()))
        .unwrap_or_default();

    let mut html = String::from("<div>");
    if let Some(cover) = cover_image {
        html.push_str(&format!(
            "<img src=\"{}\" alt=\"{}\" style=\"max-width: 200px; height: auto; margin-bottom: 10px;\" />",
            escape_xml(cover),
            comic_title,
        ));
    }
    html.push_str(&format!("<p><strong>{}</strong></p>", comic_title));
    if let Some(chap) = follow.chapter_number() {
        html.push_str(&format!("<p>Chapter {}</p>", escape_xml(chap)));
    }
    html.push_str(&format!("<p>Status: {}</p>", status_text(status)));
    html.push_str(&format!("<p>Last Chapter: {}</p>", last_chapter));
    html.push_str("</div>");
    html
}

fn status_text(status: i64) -> &'static str {
    match status {
        1 => "Ongoing",
        2 => "Completed",
        3 => "Hiatus",
        4 => "Cancelled",
        _ => "Unknown",
    }
}

/// Escape the five XML-significant characters for element/attribute content.
pub fn escape_xml(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

/// Make a value safe inside a CDATA section: a literal `]]>` is split across
/// two sections so it cannot terminate the enclosing block early.
pub fn escape_cdata(input: &str) -> String {
    input.replace("]]>", "]]]]><![CDATA[>")
}
