// Line-oriented rendering of completion replies

use std::io;

use log::debug;

use crate::engine::directive::CompletionReply;

/// Sentinel character opening the trailing directive line
pub const DIRECTIVE_SENTINEL: char = ':';

/// Render a reply as the line-oriented completion payload
///
/// Candidate lines come first, one per line, each optionally carrying a
/// tab-separated description; the final line is the sentinel character
/// followed by the decimal directive bitmask. `with_descriptions = false`
/// strips descriptions even when the reply supplies them.
pub fn render(reply: &CompletionReply, with_descriptions: bool) -> String {
    let mut out = String::new();
    match reply {
        CompletionReply::Candidates { items, .. } => {
            for candidate in items {
                out.push_str(&candidate.value);
                if with_descriptions {
                    if let Some(description) = &candidate.description {
                        out.push('\t');
                        out.push_str(description);
                    }
                }
                out.push('\n');
            }
        }
        CompletionReply::FileExtensions(extensions) => {
            for extension in extensions {
                out.push_str(extension);
                out.push('\n');
            }
        }
        CompletionReply::Directories(Some(base)) => {
            out.push_str(base);
            out.push('\n');
        }
        // No candidate lines: directory completion in the current
        // directory, or a failed invocation.
        CompletionReply::Directories(None) | CompletionReply::Failed => {}
    }

    let directive = reply.directive();
    debug!("completion ended with directive {directive}");
    out.push(DIRECTIVE_SENTINEL);
    out.push_str(&directive.bits().to_string());
    out.push('\n');
    out
}

/// Render a reply directly into a writer
pub fn write_to<W: io::Write>(writer: &mut W, reply: &CompletionReply, with_descriptions: bool) -> io::Result<()> {
    writer.write_all(render(reply, with_descriptions).as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::candidate::Candidate;

    fn animals_reply() -> CompletionReply {
        CompletionReply::candidates(vec![
            Candidate::with_description("bear", "an animal"),
            Candidate::new("dog"),
        ])
    }

    #[test]
    fn test_candidates_with_descriptions_and_sentinel() {
        let out = render(&animals_reply().no_space(), true);
        assert_eq!(out, "bear\tan animal\ndog\n:2\n");
    }

    #[test]
    fn test_no_descriptions_mode_strips_descriptions() {
        let out = render(&animals_reply(), false);
        assert_eq!(out, "bear\ndog\n:0\n");
    }

    #[test]
    fn test_empty_result_is_just_the_sentinel() {
        let out = render(&CompletionReply::empty().no_file_fallback(), true);
        assert_eq!(out, ":4\n");
    }

    #[test]
    fn test_file_extensions_render_as_plain_lines() {
        let reply = CompletionReply::FileExtensions(vec!["yaml".to_string(), "json".to_string()]);
        assert_eq!(render(&reply, true), "yaml\njson\n:8\n");
    }

    #[test]
    fn test_directory_filter_renders_optional_base() {
        assert_eq!(render(&CompletionReply::Directories(None), true), ":16\n");
        let reply = CompletionReply::Directories(Some("dir".to_string()));
        assert_eq!(render(&reply, true), "dir\n:16\n");
    }

    #[test]
    fn test_failed_reply_never_renders_candidates() {
        assert_eq!(render(&CompletionReply::Failed, true), ":1\n");
    }

    #[test]
    fn test_write_to_matches_render() {
        let reply = animals_reply();
        let mut buffer = Vec::new();
        write_to(&mut buffer, &reply, true).unwrap();
        assert_eq!(String::from_utf8(buffer).unwrap(), render(&reply, true));
    }
}
