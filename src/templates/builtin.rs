//! Built-in text patterns.
//!
//! Patterns are case-insensitive and anchored nowhere: they search the
//! whole ability text. Order matters: the compiler tries templates in
//! the order returned by [`builtin_templates`] and stops at the first
//! match, and the draw template checks its coin-flip form before the
//! plain form.

use regex_lite::Regex;

use crate::ir::{Condition, EffectNode, Parameters};

use super::matcher::RuleTemplate;

/// The built-in templates in match order: draw, search, damage.
#[must_use]
pub fn builtin_templates() -> Vec<RuleTemplate> {
    vec![draw_template(), search_template(), damage_template()]
}

/// `"flip a coin. if heads, draw N cards"` and `"draw N cards"`.
fn draw_template() -> RuleTemplate {
    let coin = Regex::new(r"(?i)flip a coin\.\s*if heads, draw (\d+) cards?")
        .expect("builtin pattern is valid");
    let plain = Regex::new(r"(?i)draw (\d+) cards?").expect("builtin pattern is valid");
    RuleTemplate::new("Draw cards", move |text| {
        if let Some(caps) = coin.captures(text) {
            let count: u64 = caps[1].parse().ok()?;
            return Some(EffectNode::gate(
                Condition::equals("variables.coin_flip", "heads"),
                draw_node(count),
                Some(draw_node(0)),
            ));
        }
        let caps = plain.captures(text)?;
        let count: u64 = caps[1].parse().ok()?;
        Some(draw_node(count))
    })
}

/// `"search your deck for (up to) N <target> card(s)"`, one search step
/// per copy requested.
fn search_template() -> RuleTemplate {
    let pattern = Regex::new(r"(?i)search your deck for (?:up to )?(\d+) ([a-z\s]+?) card")
        .expect("builtin pattern is valid");
    RuleTemplate::new("Search deck", move |text| {
        let caps = pattern.captures(text)?;
        let count: usize = caps[1].parse().ok()?;
        let target = caps[2].trim().to_string();
        let steps: Vec<EffectNode> = (0..count).map(|_| search_node(&target)).collect();
        Some(EffectNode::sequence(steps))
    })
}

/// `"this attack does N more damage"`.
fn damage_template() -> RuleTemplate {
    let pattern =
        Regex::new(r"(?i)this attack does (\d+) more damage").expect("builtin pattern is valid");
    RuleTemplate::new("Increase damage", move |text| {
        let caps = pattern.captures(text)?;
        let amount: i64 = caps[1].parse().ok()?;
        let mut parameters = Parameters::new();
        parameters.insert("amount".to_string(), amount.into());
        parameters.insert("target".to_string(), "opponent".into());
        Some(EffectNode::atomic("AddDamage", parameters))
    })
}

fn draw_node(count: u64) -> EffectNode {
    let mut parameters = Parameters::new();
    parameters.insert("count".to_string(), count.into());
    EffectNode::atomic("Draw", parameters)
}

fn search_node(target: &str) -> EffectNode {
    let mut parameters = Parameters::new();
    parameters.insert("card_name".to_string(), target.into());
    parameters.insert("destination".to_string(), "hand".into());
    EffectNode::atomic("SearchDeck", parameters)
}
