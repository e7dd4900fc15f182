//! Integration tests for auto-exploring generated floors.

use std::collections::HashSet;
use undercroft::{
    AutoexploreState, FloorContext, GenerationConfig, Position, StepOutcome, StopReason,
    UndercroftResult,
};

const TURN_LIMIT: u32 = 5_000;

/// Lets autoexplore walk the player until it stops. Returns the final position.
fn explore_until_stopped(
    floor: &mut FloorContext,
    autoexplore: &mut AutoexploreState,
    mut player: Position,
    radius: u32,
) -> UndercroftResult<Position> {
    let none = HashSet::new();
    for _ in 0..TURN_LIMIT {
        floor.reveal_visibility(player, radius, &[]);
        let Some(direction) = autoexplore.next_step(floor, player, &[])? else {
            return Ok(player);
        };
        match floor.attempt_step(player, direction, &none) {
            StepOutcome::Moved(to) => player = to,
            other => panic!("explore step from {} was not walkable: {:?}", player, other),
        }
    }
    panic!("autoexplore did not stop within {} turns", TURN_LIMIT);
}

#[test]
fn test_explores_floors_without_secret_rooms_completely() -> UndercroftResult<()> {
    for seed in [1, 7, 42, 1234] {
        let mut config = GenerationConfig::for_testing(seed);
        config.secret_room_chance = 0.0;
        let mut floor = FloorContext::generate(&config)?;
        let mut autoexplore = AutoexploreState::new();
        autoexplore.toggle();

        let start = floor.player_start();
        explore_until_stopped(&mut floor, &mut autoexplore, start, config.sight_radius)?;

        assert_eq!(autoexplore.last_stop, Some(StopReason::FullyExplored), "seed {}", seed);
        assert!(floor.visibility().is_fully_explored(floor.grid()));
        assert!(!autoexplore.enabled);
    }
    Ok(())
}

#[test]
fn test_only_the_hidden_room_can_stay_unseen() -> UndercroftResult<()> {
    for seed in 0..6 {
        let config = GenerationConfig::for_testing(seed);
        let mut floor = FloorContext::generate(&config)?;
        let mut autoexplore = AutoexploreState::new();
        autoexplore.toggle();

        let start = floor.player_start();
        explore_until_stopped(&mut floor, &mut autoexplore, start, config.sight_radius)?;

        let hidden: HashSet<Position> = floor.secret().interior().iter().copied().collect();
        let unseen: Vec<Position> = floor
            .grid()
            .ground_positions()
            .filter(|&pos| !floor.visibility().is_visited(pos))
            .collect();
        assert!(
            unseen.iter().all(|pos| hidden.contains(pos)),
            "seed {}: unseen tiles outside the hidden room: {:?}",
            seed,
            unseen
        );
        match autoexplore.last_stop {
            Some(StopReason::FullyExplored) => assert!(unseen.is_empty()),
            Some(StopReason::Unreachable) => assert!(!unseen.is_empty()),
            other => panic!("seed {}: unexpected stop {:?}", seed, other),
        }
    }
    Ok(())
}

#[test]
fn test_stops_when_hostile_comes_into_view() -> UndercroftResult<()> {
    let config = GenerationConfig::for_testing(3);
    let mut floor = FloorContext::generate(&config)?;
    let player = floor.player_start();
    floor.reveal_visibility(player, config.sight_radius, &[]);

    let hostile = floor
        .grid()
        .ground_positions()
        .find(|&pos| pos != player && floor.visibility().is_visible(pos))
        .expect("start room has visible ground");

    let mut autoexplore = AutoexploreState::new();
    autoexplore.toggle();
    assert_eq!(autoexplore.next_step(&floor, player, &[hostile])?, None);
    assert_eq!(autoexplore.last_stop, Some(StopReason::HostileInSight));

    // Turning it back on clears the reason
    autoexplore.toggle();
    assert_eq!(autoexplore.last_stop, None);
    Ok(())
}

#[test]
fn test_wider_sight_explores_in_fewer_turns() -> UndercroftResult<()> {
    let mut config = GenerationConfig::for_testing(99);
    config.secret_room_chance = 0.0;

    let mut turns = Vec::new();
    for radius in [1, 6] {
        let mut floor = FloorContext::generate(&config)?;
        let mut autoexplore = AutoexploreState::new();
        autoexplore.toggle();
        let mut player = floor.player_start();
        let mut taken = 0;
        let none = HashSet::new();
        while taken < TURN_LIMIT {
            floor.reveal_visibility(player, radius, &[]);
            let Some(direction) = autoexplore.next_step(&floor, player, &[])? else {
                break;
            };
            if let StepOutcome::Moved(to) = floor.attempt_step(player, direction, &none) {
                player = to;
            }
            taken += 1;
        }
        assert_eq!(autoexplore.last_stop, Some(StopReason::FullyExplored));
        turns.push(taken);
    }
    assert!(turns[1] < turns[0], "turns per radius: {:?}", turns);
    Ok(())
}
