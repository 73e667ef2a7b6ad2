//! Lenient handling of unrecognized flags.
//!
//! Unknown flags never fail the run. They are stripped out before clap sees
//! the argument list and kept aside for debug logging. An unknown flag only
//! carries a value when written as `--name=value`; otherwise it is treated as
//! a boolean and the following argument stays a target.

use std::ffi::OsString;

use clap::{Arg, Command};

/// Arguments partitioned against a command's schema.
#[derive(Debug, Default)]
pub struct Split {
    /// Arguments clap understands, in original order
    pub known: Vec<OsString>,
    /// Dropped flags, as written (short clusters split per character)
    pub unknown: Vec<String>,
    seen: Vec<String>,
}

impl Split {
    /// Whether a known flag with this id appeared before any `--`.
    pub fn saw(&self, id: &str) -> bool {
        self.seen.iter().any(|seen| seen == id)
    }
}

/// Partitions `raw` (program name excluded) into known and unknown flags.
pub fn split_unknown<I>(cmd: &Command, raw: I) -> Split
where
    I: IntoIterator<Item = OsString>,
{
    let mut split = Split::default();
    let mut raw = raw.into_iter();

    while let Some(arg) = raw.next() {
        let Some(text) = arg.to_str().map(str::to_owned) else {
            split.known.push(arg);
            continue;
        };

        if text == "--" {
            split.known.push(arg);
            split.known.extend(raw.by_ref());
            break;
        }

        if let Some(long) = text.strip_prefix("--") {
            let (name, inline_value) = match long.split_once('=') {
                Some((name, _)) => (name, true),
                None => (long, false),
            };

            match find(cmd, |a| a.get_long() == Some(name)) {
                Some(flag) => {
                    split.seen.push(flag.get_id().to_string());
                    split.known.push(arg);
                    if takes_value(flag) && !inline_value {
                        split.known.extend(raw.next());
                    }
                }
                None => split.unknown.push(text),
            }
        } else if text.len() > 1 && text.starts_with('-') {
            let mut kept = String::from("-");
            let mut needs_value = false;

            for (idx, c) in text[1..].char_indices() {
                let Some(flag) = find(cmd, |a| a.get_short() == Some(c)) else {
                    split.unknown.push(format!("-{c}"));
                    continue;
                };

                split.seen.push(flag.get_id().to_string());
                kept.push(c);
                if takes_value(flag) {
                    // rest of the cluster is the value, as in `-obuild`
                    let rest = &text[1 + idx + c.len_utf8()..];
                    if rest.is_empty() {
                        needs_value = true;
                    } else {
                        kept.push_str(rest);
                    }
                    break;
                }
            }

            if kept.len() > 1 {
                split.known.push(OsString::from(kept));
            }
            if needs_value {
                split.known.extend(raw.next());
            }
        } else {
            split.known.push(arg);
        }
    }

    if !split.unknown.is_empty() {
        log::debug!("Ignoring unknown flags: {}", split.unknown.join(" "));
    }

    split
}

fn find<'a>(cmd: &'a Command, pred: impl Fn(&Arg) -> bool) -> Option<&'a Arg> {
    cmd.get_arguments().find(|a| pred(a))
}

fn takes_value(arg: &Arg) -> bool {
    arg.get_action().takes_values()
}
