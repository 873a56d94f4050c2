//! End-to-end scenarios from spec.md §8, exercised through the public
//! crate API rather than module-internal unit tests.

use qwirkle::board::Position;
use qwirkle::game::GameState;
use qwirkle::tile::Tile;

#[test]
fn scenario_one_first_move_scores_one_and_reports_last_move_position() {
    let mut game = GameState::new(42);
    let slot1 = game.current_hand().get(0).unwrap();
    let score = game.play_tiles(&[(Position::ORIGIN, slot1)]).unwrap();
    assert_eq!(score, 1);
    assert_eq!(game.current_player, 1);
    assert_eq!(game.history.last().unwrap().placements, vec![(Position::ORIGIN, slot1)]);
}

#[test]
fn scenario_four_rejected_move_leaves_state_unchanged() {
    let mut game = GameState::new(7);
    let occupied = Position::new(0, 5);
    game.board.set(occupied, Tile::new(0, 0));
    let board_before = game.board.clone();
    let scores_before = game.scores;

    let tile_not_in_hand = Tile::all().find(|t| !game.current_hand().contains(*t)).unwrap();
    let err = game.play_tiles(&[(occupied, tile_not_in_hand)]).unwrap_err();

    assert_eq!(err.reason(), "Invalid move");
    assert_eq!(game.board.positions().count(), board_before.positions().count());
    assert_eq!(game.scores, scores_before);
}

#[test]
fn first_move_without_origin_is_rejected_but_with_origin_is_accepted() {
    let mut off_origin_game = GameState::new(99);
    let tile = off_origin_game.current_hand().get(0).unwrap();
    assert!(off_origin_game.play_tiles(&[(Position::new(1, 1), tile)]).is_err());
    assert!(off_origin_game.board.is_empty());

    let mut origin_game = GameState::new(99);
    let tile = origin_game.current_hand().get(0).unwrap();
    let score = origin_game.play_tiles(&[(Position::ORIGIN, tile)]).unwrap();
    assert_eq!(score, 1);
    assert!(origin_game.board.has(Position::ORIGIN));
}

#[test]
fn swap_with_more_indices_than_the_bag_holds_is_rejected() {
    let mut game = GameState::new(3);
    // Drain the bag down below the swap size we're about to request.
    let remaining = game.bag.remaining();
    game.bag.draw(remaining - 1);
    let err = game.swap_tiles(&[0, 1]).unwrap_err();
    assert_eq!(err.reason(), "Cannot swap tiles");
}

#[test]
fn hand_add_overflow_is_silently_capped() {
    let mut hand = qwirkle::hand::Hand::new();
    hand.add(Tile::all());
    assert_eq!(hand.size(), 6);
}

#[test]
fn a_full_line_of_six_is_a_qwirkle_and_a_seventh_is_rejected() {
    let mut game = GameState::new(1);
    let mut board = qwirkle::board::Board::new();
    for c in 0..5i32 {
        board.set(Position::new(0, c), Tile::new(c as u8, 0));
    }
    game.board = board;
    let placements = vec![(Position::new(0, 5), Tile::new(5, 0))];
    assert!(qwirkle::rules::validate_move(&mut game.board, &placements));
    assert_eq!(qwirkle::rules::score_move(&mut game.board, &placements), 12);

    for (p, t) in &placements {
        game.board.set(*p, *t);
    }
    assert!(!qwirkle::rules::is_valid_single_placement(&mut game.board, Position::new(0, 6), Tile::new(0, 1)));
}
