//! Player-facing descriptions of effect chains.

use crate::dice::RandomValue;
use crate::project::ProjectionTable;

use super::chain::{ChoiceBlock, Effect, EffectChain, EffectNode};
use super::kind::{EffectInfoFormat, EffectKind};
use super::registry::EffectTable;

/// Tables a description reads from.
#[derive(Clone, Copy)]
struct Tables<'t> {
    effects: &'t EffectTable,
    projections: &'t ProjectionTable,
}

/// Describes `chain` in one sentence fragment.
///
/// Descriptions are joined with ", " and a final " and ". `prefix` is put in
/// front when anything at all is described. `boost` is the device-skill
/// percentage shown next to boosted damage. With `only_first` only the
/// first effect (with its alternatives, for a choice) is described.
///
/// Returns `None` when no effect in the chain has a description.
pub fn describe(
    chain: &EffectChain,
    effects: &EffectTable,
    projections: &ProjectionTable,
    prefix: Option<&str>,
    boost: i32,
    only_first: bool,
) -> Option<String> {
    let tables = Tables {
        effects,
        projections,
    };
    let take = if only_first { 1 } else { chain.len() };
    let parts: Vec<String> = chain
        .iter()
        .take(take)
        .filter_map(|effect| describe_effect(tables, effect, boost))
        .collect();
    if parts.is_empty() {
        return None;
    }
    let mut out = prefix.unwrap_or_default().to_string();
    out.push_str(&join(&parts, " and "));
    Some(out)
}

fn describe_effect(tables: Tables<'_>, effect: &Effect, boost: i32) -> Option<String> {
    match effect.choice() {
        Some(block) => describe_choice(tables, block, boost),
        None => describe_node(tables, effect.node(), boost),
    }
}

/// Joins `parts` with ", " and `last` before the final one.
fn join(parts: &[String], last: &str) -> String {
    let mut out = String::new();
    for (i, part) in parts.iter().enumerate() {
        if i > 0 {
            out.push_str(if i + 1 == parts.len() { last } else { ", " });
        }
        out.push_str(part);
    }
    out
}

// ============================================================================
// Choices
// ============================================================================

/// Describes the alternatives of a choice block.
///
/// Nested choices are skipped; they never run as alternatives. When every
/// alternative is the same cone with the same dice, the elements are listed
/// once instead ("breathes a cone of fire, cold or acid ...").
fn describe_choice(tables: Tables<'_>, block: &ChoiceBlock, boost: i32) -> Option<String> {
    let lead = tables.effects.desc(block.node.kind).unwrap_or("randomly ");
    let valid: Vec<&EffectNode> = block
        .children
        .iter()
        .filter(|child| child.choice().is_none())
        .map(Effect::node)
        .filter(|node| tables.effects.desc(node.kind).is_some())
        .collect();
    let first = valid.first()?;

    let same_cone = tables.effects.format(first.kind) == EffectInfoFormat::Breath
        && valid.iter().all(|node| {
            node.kind == first.kind && node.other == first.other && node.dice == first.dice
        });
    if same_cone && let Some(text) = describe_cones(tables, &valid, boost) {
        return Some(format!("{lead}{text}"));
    }

    let parts: Vec<String> = valid
        .iter()
        .filter_map(|node| describe_node(tables, node, boost))
        .collect();
    if parts.is_empty() {
        return None;
    }
    Some(format!("{lead}{}", join(&parts, " or ")))
}

fn describe_cones(tables: Tables<'_>, nodes: &[&EffectNode], boost: i32) -> Option<String> {
    let first = nodes.first()?;
    let template = tables.effects.desc(first.kind)?;
    let elements: Vec<String> = nodes
        .iter()
        .filter_map(|node| node.subtype.projection())
        .map(|kind| tables.projections.player_desc(kind).to_string())
        .collect();
    let listed = if elements.len() > 2 {
        join(&elements, ", or ")
    } else {
        join(&elements, " or ")
    };

    let value = node_value(first);
    let mut text = fill(
        template,
        &[listed, first.other.to_string(), dice_string(&value)],
    );
    let boost = if first.kind == EffectKind::Breath { 0 } else { boost };
    append_damage(&mut text, &value, boost);
    Some(text)
}

// ============================================================================
// Single nodes
// ============================================================================

fn node_value(node: &EffectNode) -> RandomValue {
    node.dice.map(|dice| dice.random_value()).unwrap_or_default()
}

fn describe_node(tables: Tables<'_>, node: &EffectNode, boost: i32) -> Option<String> {
    use EffectInfoFormat as F;

    let template = tables.effects.desc(node.kind)?;
    let value = node_value(node);
    let dice = dice_string(&value);
    let info = node
        .subtype
        .projection()
        .map(|kind| tables.projections.get(kind));
    let desc = info.map(|info| info.desc.clone()).unwrap_or_default();
    let player_desc = info.map(|info| info.player_desc.clone()).unwrap_or_default();
    let timed = node
        .subtype
        .timed()
        .map(|kind| kind.desc())
        .or_else(|| node.subtype.mon_timed().map(|kind| kind.desc()))
        .unwrap_or_default()
        .to_string();

    let text = match tables.effects.format(node.kind) {
        F::None => fill(template, &[]),
        F::Dice => fill(template, &[dice]),
        F::Heal => {
            let minimum = if value.m_bonus != 0 {
                format!(" (or {}%, whichever is greater)", value.m_bonus)
            } else {
                String::new()
            };
            fill(template, &[dice, minimum])
        }
        F::Const => fill(template, &[(value.base / 2).to_string()]),
        F::Cure => fill(template, &[timed]),
        F::Timed => fill(template, &[timed, dice]),
        F::Seen | F::Bolt | F::Touch => fill(template, &[desc]),
        F::Summ => fill(template, &["monsters".to_string()]),
        F::Tele => {
            let who = if node.subtype.is_set() { "a monster" } else { "you" };
            let distance = if value.m_bonus != 0 {
                "a level-dependent distance".to_string()
            } else {
                format!("{} grids", value.base)
            };
            fill(template, &[who.to_string(), distance])
        }
        F::Light => fill(template, &[dice, node.radius.to_string()]),
        F::Ball => {
            let mut text = fill(
                template,
                &[player_desc, node.radius.to_string(), dice],
            );
            append_damage(&mut text, &value, boost);
            text
        }
        F::Spot => {
            let inner = if node.other != 0 { node.other } else { node.radius };
            let mut text = fill(
                template,
                &[
                    player_desc,
                    node.radius.to_string(),
                    inner.to_string(),
                    dice,
                ],
            );
            append_damage(&mut text, &value, boost);
            text
        }
        F::Breath => {
            let mut text = fill(
                template,
                &[player_desc, node.other.to_string(), dice],
            );
            let boost = if node.kind == EffectKind::Breath { 0 } else { boost };
            append_damage(&mut text, &value, boost);
            text
        }
        F::BoltDam => {
            let mut text = fill(template, &[desc, dice]);
            append_damage(&mut text, &value, boost);
            text
        }
    };
    (!text.is_empty()).then_some(text)
}

/// `"5+2d6"`, `"2d6"` or `"5"`; the bonus part is not shown.
fn dice_string(value: &RandomValue) -> String {
    match (value.base, value.dice) {
        (_, 0) => value.base.to_string(),
        (0, dice) => format!("{dice}d{}", value.sides),
        (base, dice) => format!("{base}+{dice}d{}", value.sides),
    }
}

/// Notes the device boost and, when there is anything to average, the
/// average damage to one decimal.
fn append_damage(text: &mut String, value: &RandomValue, boost: i32) {
    if boost != 0 {
        text.push_str(&format!(", which your device skill increases by {boost}%"));
    }
    if value.randcalc_varies() || boost > 0 {
        let average = value.base + value.dice * (value.sides + 1) / 2;
        let tenths = (100 + boost) * average / 10;
        text.push_str(&format!(
            " for an average of {}.{} damage",
            tenths / 10,
            tenths % 10
        ));
    }
}

/// Substitutes `%s` and `%d` in order; `%%` is a literal percent sign.
fn fill(template: &str, args: &[String]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut args = args.iter();
    let mut chars = template.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }
        match chars.peek() {
            Some('s') | Some('d') => {
                chars.next();
                if let Some(arg) = args.next() {
                    out.push_str(arg);
                }
            }
            Some('%') => {
                chars.next();
                out.push('%');
            }
            _ => out.push('%'),
        }
    }
    out
}
