//! Human-readable rendering of command results.
//!
//! With `--json` the binary prints the serialized values instead; these
//! renderers only shape the plain-text view.

use medallium_core::{AchievementView, ClaimableReward, UnlockOutcome};
use medallium_progress::ClaimReceipt;
use medallium_types::{CategoryKind, CollectionStats, Reward, RewardSource};

use crate::profile::WalletSummary;

fn source_label(source: &RewardSource) -> String {
    source.tag()
}

fn reward_label(reward: &Reward) -> String {
    let mut parts = Vec::new();
    if let Some(points) = reward.points {
        parts.push(format!("{points} pts"));
    }
    for (label, id) in [
        ("background", &reward.background),
        ("track", &reward.music_track),
        ("frame", &reward.frame),
        ("title", &reward.title),
        ("badge", &reward.badge),
    ] {
        if let Some(id) = id {
            parts.push(format!("{label} {id}"));
        }
    }
    if parts.is_empty() {
        "nothing".to_owned()
    } else {
        parts.join(", ")
    }
}

/// Render the aggregate stats.
pub fn stats(stats: &CollectionStats) -> String {
    let mut lines = vec![
        format!(
            "Collection: {}/{} ({}%)",
            stats.unlocked_items, stats.total_items, stats.completion_percentage
        ),
        format!(
            "Streak: {} current, {} best, {} active days",
            stats.current_streak, stats.best_streak, stats.active_days
        ),
        format!(
            "Circles: {}/{}  Achievements: {}/{}  Claimable: {}",
            stats.circles_completed,
            stats.circles_total,
            stats.achievements_unlocked,
            stats.achievements_total,
            stats.claimable_rewards
        ),
    ];

    if !stats.recent_unlocks.is_empty() {
        lines.push("Recent:".to_owned());
        for record in &stats.recent_unlocks {
            lines.push(format!(
                "  {} ({})",
                record.item_name,
                record.unlocked_at.format("%Y-%m-%d %H:%M")
            ));
        }
    }

    if let Some(tribes) = stats.by_category.get(&CategoryKind::Tribe) {
        lines.push(format!("{}:", CategoryKind::Tribe.label()));
        for (tribe, entry) in tribes {
            lines.push(format!(
                "  {tribe}: {}/{} ({}%)",
                entry.unlocked, entry.total, entry.percentage
            ));
        }
    }

    if !stats.next_milestones.is_empty() {
        lines.push("Next milestones:".to_owned());
        for milestone in &stats.next_milestones {
            lines.push(format!(
                "  {} ({}/{}, {} to go)",
                milestone.label, milestone.current, milestone.goal, milestone.remaining
            ));
        }
    }
    lines.join("\n")
}

/// Render one unlock result.
pub fn unlock(outcome: &UnlockOutcome) -> String {
    if !outcome.newly_unlocked {
        return format!("{} was already unlocked", outcome.item_id);
    }
    let mut lines = vec![format!("Unlocked {}", outcome.item_id)];
    for circle in &outcome.circles_completed {
        lines.push(format!("  circle completed: {circle}"));
    }
    for achievement in &outcome.achievements_unlocked {
        lines.push(format!("  achievement unlocked: {achievement}"));
    }
    lines.join("\n")
}

/// Render a successful claim.
pub fn receipt(receipt: &ClaimReceipt) -> String {
    let mut lines = vec![format!(
        "Claimed {}: {} pts credited",
        source_label(&receipt.source),
        receipt.points_credited
    )];
    for grant in &receipt.cosmetics {
        let state = if grant.newly_granted {
            "granted"
        } else {
            "already owned"
        };
        lines.push(format!("  {:?} {}: {state}", grant.kind, grant.id));
    }
    lines.join("\n")
}

/// Render the list of claimable rewards.
pub fn claimable(rewards: &[ClaimableReward]) -> String {
    if rewards.is_empty() {
        return "Nothing to claim".to_owned();
    }
    rewards
        .iter()
        .map(|r| {
            format!(
                "{} \"{}\": {}",
                source_label(&r.source),
                r.name,
                reward_label(&r.reward)
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Render the achievement list.
pub fn achievements(views: &[AchievementView]) -> String {
    views
        .iter()
        .map(|v| {
            let mark = match (v.unlocked, v.reward_claimed) {
                (true, true) => "[x]",
                (true, false) => "[!]",
                (false, _) => "[ ]",
            };
            format!("{mark} {:?} {}: {}", v.tier, v.name, v.description)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Render the wallet summary.
pub fn wallet(summary: &WalletSummary) -> String {
    let mut lines = vec![format!(
        "Balance: {} pts (earned {}, spent {})",
        summary.balance, summary.total_earned, summary.total_spent
    )];
    for owned in summary.cosmetics.iter().filter(|c| !c.ids.is_empty()) {
        lines.push(format!("  {:?}: {}", owned.kind, owned.ids.join(", ")));
    }
    lines.join("\n")
}
