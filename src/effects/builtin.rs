//! Built-in effect handlers.
//!
//! Handlers operate on the context's JSON state tree, which follows the
//! `players.<name>.<zone>` / `damage.<target>` layout. Zones are created
//! on demand; a zone that exists with a non-list shape is an error.

use serde_json::{Map, Value};

use crate::core::ExecutionContext;
use crate::ir::Parameters;

use super::registry::ExecutionError;

/// Move up to `count` cards (default 1) from the player's deck to their
/// hand, head of deck first. Stops early when the deck runs out.
pub fn draw(context: &ExecutionContext, parameters: &Parameters) -> Result<(), ExecutionError> {
    let player = param_player(context, parameters, "Draw")?;
    let count = match parameters.get("count") {
        Some(value) => value.as_u64().ok_or(ExecutionError::InvalidParameter {
            effect: "Draw",
            parameter: "count",
        })?,
        None => 1,
    };

    let mut state = context.state_mut();
    let player_state = player_entry(&mut state, &player)?;
    ensure_zone(player_state, "deck")?;
    ensure_zone(player_state, "hand")?;
    for _ in 0..count {
        let card = {
            let deck = ensure_zone(player_state, "deck")?;
            if deck.is_empty() {
                break;
            }
            deck.remove(0)
        };
        ensure_zone(player_state, "hand")?.push(card);
    }
    Ok(())
}

/// Move the first deck card matching `card_name` to the `destination`
/// zone (default `hand`). Fails when no copy is in the deck.
pub fn search_deck(
    context: &ExecutionContext,
    parameters: &Parameters,
) -> Result<(), ExecutionError> {
    let player = param_player(context, parameters, "SearchDeck")?;
    let card_name = match parameters.get("card_name") {
        Some(Value::String(name)) if !name.is_empty() => name.clone(),
        Some(Value::String(_)) | None | Some(Value::Null) => {
            return Err(ExecutionError::MissingParameter {
                effect: "SearchDeck",
                parameter: "card_name",
            })
        }
        Some(_) => {
            return Err(ExecutionError::InvalidParameter {
                effect: "SearchDeck",
                parameter: "card_name",
            })
        }
    };
    let destination = match parameters.get("destination") {
        Some(value) => value
            .as_str()
            .ok_or(ExecutionError::InvalidParameter {
                effect: "SearchDeck",
                parameter: "destination",
            })?
            .to_string(),
        None => "hand".to_string(),
    };

    let mut state = context.state_mut();
    let player_state = player_entry(&mut state, &player)?;
    ensure_zone(player_state, "deck")?;
    ensure_zone(player_state, &destination)?;
    let position = ensure_zone(player_state, "deck")?
        .iter()
        .position(|card| card.as_str() == Some(card_name.as_str()));
    match position {
        Some(index) => {
            let card = ensure_zone(player_state, "deck")?.remove(index);
            ensure_zone(player_state, &destination)?.push(card);
            Ok(())
        }
        None => Err(ExecutionError::CardNotFound(card_name)),
    }
}

/// Accumulate `amount` (default 0, must be non-negative) into the damage
/// counter for `target`, creating the entry at zero when absent.
pub fn add_damage(
    context: &ExecutionContext,
    parameters: &Parameters,
) -> Result<(), ExecutionError> {
    let target = match parameters.get("target") {
        Some(Value::String(target)) => target.clone(),
        None | Some(Value::Null) => {
            return Err(ExecutionError::MissingParameter {
                effect: "AddDamage",
                parameter: "target",
            })
        }
        Some(_) => {
            return Err(ExecutionError::InvalidParameter {
                effect: "AddDamage",
                parameter: "target",
            })
        }
    };
    let amount = match parameters.get("amount") {
        Some(value) => value.as_i64().ok_or(ExecutionError::InvalidParameter {
            effect: "AddDamage",
            parameter: "amount",
        })?,
        None => 0,
    };
    if amount < 0 {
        return Err(ExecutionError::NegativeAmount(amount));
    }

    let mut state = context.state_mut();
    let root = state
        .as_object_mut()
        .ok_or(ExecutionError::MalformedState("state root is not an object"))?;
    let pool = root
        .entry("damage")
        .or_insert_with(|| Value::Object(Map::new()));
    let pool = pool
        .as_object_mut()
        .ok_or(ExecutionError::MalformedState("'damage' is not an object"))?;
    let current = match pool.get(&target) {
        None => 0,
        Some(value) => value.as_i64().ok_or(ExecutionError::MalformedState(
            "damage entry is not an integer",
        ))?,
    };
    pool.insert(target, Value::from(current + amount));
    Ok(())
}

fn param_player(
    context: &ExecutionContext,
    parameters: &Parameters,
    effect: &'static str,
) -> Result<String, ExecutionError> {
    match parameters.get("player") {
        None | Some(Value::Null) => Ok(context.controller.clone()),
        Some(Value::String(player)) => Ok(player.clone()),
        Some(_) => Err(ExecutionError::InvalidParameter {
            effect,
            parameter: "player",
        }),
    }
}

fn player_entry<'a>(
    state: &'a mut Value,
    player: &str,
) -> Result<&'a mut Map<String, Value>, ExecutionError> {
    let root = state
        .as_object_mut()
        .ok_or(ExecutionError::MalformedState("state root is not an object"))?;
    let players = root
        .entry("players")
        .or_insert_with(|| Value::Object(Map::new()));
    let players = players
        .as_object_mut()
        .ok_or(ExecutionError::MalformedState("'players' is not an object"))?;
    let entry = players
        .get_mut(player)
        .ok_or_else(|| ExecutionError::PlayerNotFound(player.to_string()))?;
    entry
        .as_object_mut()
        .ok_or(ExecutionError::MalformedState("player entry is not an object"))
}

fn ensure_zone<'a>(
    player_state: &'a mut Map<String, Value>,
    key: &str,
) -> Result<&'a mut Vec<Value>, ExecutionError> {
    let zone = player_state
        .entry(key)
        .or_insert_with(|| Value::Array(Vec::new()));
    zone.as_array_mut()
        .ok_or_else(|| ExecutionError::MalformedZone(key.to_string()))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn context_with_deck(deck: Value) -> ExecutionContext {
        let state = json!({
            "players": {
                "player": {"deck": deck, "hand": []}
            }
        });
        ExecutionContext::new("player", state, "turn-1")
    }

    fn params(entries: Value) -> Parameters {
        entries.as_object().cloned().unwrap_or_default()
    }

    #[test]
    fn test_draw_moves_cards_in_order() {
        let context = context_with_deck(json!(["card-a", "card-b", "card-c"]));
        draw(&context, &params(json!({"count": 2}))).unwrap();

        let state = context.snapshot_state();
        assert_eq!(state["players"]["player"]["hand"], json!(["card-a", "card-b"]));
        assert_eq!(state["players"]["player"]["deck"], json!(["card-c"]));
    }

    #[test]
    fn test_draw_defaults_to_one() {
        let context = context_with_deck(json!(["card-a", "card-b"]));
        draw(&context, &Parameters::new()).unwrap();
        assert_eq!(
            context.snapshot_state()["players"]["player"]["hand"],
            json!(["card-a"])
        );
    }

    #[test]
    fn test_draw_stops_on_empty_deck() {
        let context = context_with_deck(json!(["card-a"]));
        draw(&context, &params(json!({"count": 5}))).unwrap();

        let state = context.snapshot_state();
        assert_eq!(state["players"]["player"]["hand"], json!(["card-a"]));
        assert_eq!(state["players"]["player"]["deck"], json!([]));
    }

    #[test]
    fn test_draw_unknown_player_fails() {
        let context = context_with_deck(json!([]));
        let result = draw(&context, &params(json!({"player": "ghost"})));
        assert_eq!(
            result.unwrap_err(),
            ExecutionError::PlayerNotFound("ghost".to_string())
        );
    }

    #[test]
    fn test_draw_creates_missing_zones() {
        let state = json!({"players": {"player": {}}});
        let context = ExecutionContext::new("player", state, "turn-1");
        draw(&context, &Parameters::new()).unwrap();

        let state = context.snapshot_state();
        assert_eq!(state["players"]["player"]["deck"], json!([]));
        assert_eq!(state["players"]["player"]["hand"], json!([]));
    }

    #[test]
    fn test_draw_rejects_non_list_zone() {
        let state = json!({"players": {"player": {"deck": "not-a-list"}}});
        let context = ExecutionContext::new("player", state, "turn-1");
        let result = draw(&context, &Parameters::new());
        assert_eq!(
            result.unwrap_err(),
            ExecutionError::MalformedZone("deck".to_string())
        );
    }

    #[test]
    fn test_search_moves_matching_card() {
        let context = context_with_deck(json!(["card-a", "energy", "card-b"]));
        search_deck(&context, &params(json!({"card_name": "energy"}))).unwrap();

        let state = context.snapshot_state();
        assert_eq!(state["players"]["player"]["hand"], json!(["energy"]));
        assert_eq!(state["players"]["player"]["deck"], json!(["card-a", "card-b"]));
    }

    #[test]
    fn test_search_custom_destination() {
        let context = context_with_deck(json!(["energy"]));
        search_deck(
            &context,
            &params(json!({"card_name": "energy", "destination": "discard"})),
        )
        .unwrap();
        assert_eq!(
            context.snapshot_state()["players"]["player"]["discard"],
            json!(["energy"])
        );
    }

    #[test]
    fn test_search_missing_card_fails() {
        let context = context_with_deck(json!(["card-a"]));
        let result = search_deck(&context, &params(json!({"card_name": "energy"})));
        assert_eq!(
            result.unwrap_err(),
            ExecutionError::CardNotFound("energy".to_string())
        );
    }

    #[test]
    fn test_search_requires_card_name() {
        let context = context_with_deck(json!([]));
        let result = search_deck(&context, &Parameters::new());
        assert_eq!(
            result.unwrap_err(),
            ExecutionError::MissingParameter {
                effect: "SearchDeck",
                parameter: "card_name",
            }
        );
    }

    #[test]
    fn test_add_damage_accumulates() {
        let context = ExecutionContext::new("player", json!({}), "turn-1");
        add_damage(&context, &params(json!({"target": "opponent", "amount": 20}))).unwrap();
        add_damage(&context, &params(json!({"target": "opponent", "amount": 10}))).unwrap();
        assert_eq!(
            context.snapshot_state()["damage"]["opponent"],
            json!(30)
        );
    }

    #[test]
    fn test_add_damage_defaults_to_zero() {
        let context = ExecutionContext::new("player", json!({}), "turn-1");
        add_damage(&context, &params(json!({"target": "opponent"}))).unwrap();
        assert_eq!(context.snapshot_state()["damage"]["opponent"], json!(0));
    }

    #[test]
    fn test_add_damage_rejects_negative() {
        let context = ExecutionContext::new("player", json!({}), "turn-1");
        let result = add_damage(&context, &params(json!({"target": "opponent", "amount": -5})));
        assert_eq!(result.unwrap_err(), ExecutionError::NegativeAmount(-5));
    }

    #[test]
    fn test_add_damage_requires_target() {
        let context = ExecutionContext::new("player", json!({}), "turn-1");
        let result = add_damage(&context, &params(json!({"amount": 10})));
        assert_eq!(
            result.unwrap_err(),
            ExecutionError::MissingParameter {
                effect: "AddDamage",
                parameter: "target",
            }
        );
    }
}
