#![doc = r#"
Provenance tagging: stamping a stream with a text meta event.

Tools that rewrite files leave a note of what touched them. The tag goes
through the ordinary write path, landing on track 0 at the stream's
current write position.
"#]

use alloc::string::String;

use crate::event::TrackEvent;
use crate::meta::MetaEvent;
use crate::stream::Stream;

/// Appends `text` to track 0 as a text meta event (type `0x01`) at the
/// stream's current write position.
pub fn tag(stream: &mut Stream, text: &str) {
    stream.write_one(0, TrackEvent::after(0, MetaEvent::text(text)));
}

/// Tags the stream with this library's name and version, bracketed by
/// optional context strings: `[pre ]midiflow <version>[ post]`.
pub fn tag_header(stream: &mut Stream, pre: Option<&str>, post: Option<&str>) {
    let mut line = String::new();
    if let Some(pre) = pre {
        line.push_str(pre);
        line.push(' ');
    }
    line.push_str(concat!(
        env!("CARGO_PKG_NAME"),
        " ",
        env!("CARGO_PKG_VERSION")
    ));
    if let Some(post) = post {
        line.push(' ');
        line.push_str(post);
    }
    tag(stream, &line);
}
