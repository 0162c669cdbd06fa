//! Examine Text
//!
//! Builds the lines an examine tooltip shows for an actor's needs,
//! filtered by each need's visibility setting. Localization belongs to the
//! host; these are plain formatted strings with the same line structure.

use crate::components::{Band, NeedKind, Needs};

/// Who is looking, and with what privileges.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExamineContext {
    /// The examiner is the examined actor.
    pub is_self: bool,
    /// Admin inspection: sees hidden needs, numbers, and extended info.
    pub is_admin: bool,
}

/// Examine lines for every visible need, in catalog-map order.
pub fn examine_lines(needs: &Needs, actor_name: &str, ctx: ExamineContext) -> Vec<String> {
    let mut lines = Vec::new();
    if !needs.is_ready() || needs.is_empty() {
        return lines;
    }
    let show_extended = ctx.is_admin || ctx.is_self;
    for need in needs.iter() {
        let visibility = needs.visibility(need.kind());
        if !ctx.is_admin {
            match visibility {
                crate::ExamineVisibility::Hidden => continue,
                crate::ExamineVisibility::OwnerOnly if !ctx.is_self => continue,
                _ => {}
            }
        }

        lines.push(format!("[{}] {}", need.color(), need.name()));
        lines.push(band_phrase(need.kind(), need.band(), actor_name, ctx.is_self));
        if ctx.is_admin {
            lines.push(format!("{:.0} / {:.0}", need.value(), need.max_value()));
        }
        if show_extended {
            match need.time_to_next_band() {
                Some(seconds) => {
                    lines.push(format!("Gets worse in {}.", humanize_seconds(seconds)))
                }
                None => lines.push("It cannot get any worse.".to_string()),
            }
            if need.band() != Band::Critical {
                lines.push(format!(
                    "Empty in {}.",
                    humanize_seconds(need.time_to_floor())
                ));
            }
        }
    }
    lines
}

/// A short description of one need's band, phrased for self or observer.
fn band_phrase(kind: NeedKind, band: Band, actor_name: &str, is_self: bool) -> String {
    let (self_text, other_text) = match (kind, band) {
        (NeedKind::Hunger, Band::ExtraSatisfied) => ("You feel pleasantly full.", "looks pleasantly full."),
        (NeedKind::Hunger, Band::Satisfied) => ("You feel fed.", "looks well fed."),
        (NeedKind::Hunger, Band::Low) => ("You feel hungry.", "looks hungry."),
        (NeedKind::Hunger, Band::Critical) => ("You are starving!", "is starving!"),
        (NeedKind::Thirst, Band::ExtraSatisfied) => ("You feel refreshed.", "looks refreshed."),
        (NeedKind::Thirst, Band::Satisfied) => ("You feel hydrated.", "looks hydrated."),
        (NeedKind::Thirst, Band::Low) => ("You feel thirsty.", "looks thirsty."),
        (NeedKind::Thirst, Band::Critical) => ("You are parched!", "is parched!"),
    };
    if is_self {
        self_text.to_string()
    } else {
        format!("{actor_name} {other_text}")
    }
}

/// "about N minutes" style duration text.
pub fn humanize_seconds(seconds: f32) -> String {
    if !seconds.is_finite() {
        return "forever".to_string();
    }
    let seconds = seconds.max(0.0);
    if seconds < 60.0 {
        "less than a minute".to_string()
    } else if seconds < 90.0 * 60.0 {
        let minutes = (seconds / 60.0).round() as u64;
        if minutes == 1 {
            "about a minute".to_string()
        } else {
            format!("about {minutes} minutes")
        }
    } else {
        let hours = (seconds / 3600.0).round() as u64;
        format!("about {hours} hours")
    }
}
