#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::num::NonZero;

    use itertools::Itertools;
    use petgraph::algo::connected_components;

    use crate::builder::{BuilderInvalidReason, LevelBuilder};
    use crate::cell::Relation;
    use crate::game::{assess, Status, Tokens};
    use crate::graph::{articulation_points, Structure};
    use crate::location::{Dimension, Location};
    use crate::moves::{legal_moves, ranked_legal_moves, IllegalMove, Move};
    use crate::rules::{block_fits_locally, can_place_block, can_place_number, is_complete, region_connected, valid_numbers};
    use crate::shape::SquareStep;
    use crate::strategy::adversarial::{self, AdversarialConfig, LOSS};
    use crate::strategy::greedy::{self, GreedyConfig};
    use crate::strategy::quadrant::{self, Quadrant};
    use crate::strategy::Strategy;
    use crate::Board;

    fn size(n: usize) -> Dimension {
        NonZero::new(n).unwrap()
    }

    fn level(rows: &[&str]) -> Board {
        LevelBuilder::with_size(size(rows.len()))
            .with_rows(rows)
            .build()
            .unwrap()
    }

    fn shallow() -> AdversarialConfig {
        AdversarialConfig { depth: NonZero::new(2).unwrap(), branch_limit: 8 }
    }

    fn brute_force_cut_vertices(structure: &Structure) -> HashSet<Location> {
        let before = connected_components(&structure.graph);
        structure.graph.nodes()
            .filter(|node| {
                let mut scratch = structure.graph.clone();
                scratch.remove_node(*node);
                connected_components(&scratch) > before
            })
            .collect()
    }

    #[test]
    fn preset_level() {
        let board = LevelBuilder::preset(size(5)).build().unwrap();

        assert_eq!(format!("{}", board), ".....
..#..
.....
.....
.....
");
        assert_eq!(board.get(Location(0, 0)).unwrap().relation(SquareStep::Right), Some(Relation::LessThan));
        assert_eq!(board.get(Location(1, 0)).unwrap().relation(SquareStep::Left), Some(Relation::GreaterThan));
        assert_eq!(board.get(Location(3, 3)).unwrap().relation(SquareStep::Up), Some(Relation::LessThan));
        assert_eq!(board.get(Location(2, 3)).unwrap().relation(SquareStep::Right), Some(Relation::GreaterThan));
        assert_eq!(board.get(Location(1, 4)).unwrap().relation(SquareStep::Left), Some(Relation::GreaterThan));
        assert_eq!(board.get(Location(4, 4)).unwrap().relation(SquareStep::Up), None);
    }

    #[test]
    fn small_preset_is_empty() {
        let board = LevelBuilder::preset(size(4)).build().unwrap();
        assert_eq!(format!("{}", board), "....
....
....
....
");
    }

    #[test]
    fn relations_are_mirrored() {
        let board = LevelBuilder::preset(size(6)).build().unwrap();

        for (location, cell) in board.cells() {
            for direction in [SquareStep::Up, SquareStep::Down, SquareStep::Left, SquareStep::Right] {
                let Some(relation) = cell.relation(direction) else { continue };
                let (_, neighbor) = board.neighbor(location, direction).unwrap();
                assert_eq!(neighbor.relation(direction.invert()), Some(relation.invert()));
            }
        }
    }

    #[test]
    fn builder_rejects_bad_levels() {
        assert_eq!(
            LevelBuilder::with_size(size(2)).build().unwrap_err(),
            &vec![BuilderInvalidReason::BoardTooSmall]
        );

        assert_eq!(
            LevelBuilder::with_size(size(4))
                .add_relation(Location(0, 0), SquareStep::Up, Relation::LessThan)
                .build()
                .unwrap_err(),
            &vec![BuilderInvalidReason::FeatureOutOfBounds]
        );

        assert_eq!(
            LevelBuilder::with_size(size(4))
                .add_relation(Location(0, 0), SquareStep::Right, Relation::LessThan)
                .add_relation(Location(1, 0), SquareStep::Left, Relation::LessThan)
                .build()
                .unwrap_err(),
            &vec![BuilderInvalidReason::ConflictingRelation]
        );

        assert_eq!(
            LevelBuilder::with_size(size(4)).set_value(Location(1, 1), 5).build().unwrap_err(),
            &vec![BuilderInvalidReason::ValueOutOfRange]
        );

        assert_eq!(
            LevelBuilder::with_size(size(3)).with_rows(&["...", ".x.", "..."]).build().unwrap_err(),
            &vec![BuilderInvalidReason::UnknownSymbol('x')]
        );
    }

    #[test]
    fn restating_a_relation_from_the_other_side_is_fine() {
        let mut builder = LevelBuilder::with_size(size(4));
        builder
            .add_relation(Location(0, 0), SquareStep::Right, Relation::LessThan)
            .add_relation(Location(1, 0), SquareStep::Left, Relation::GreaterThan);

        assert!(builder.is_valid().is_none());
    }

    #[test]
    fn number_placement() {
        let mut board = LevelBuilder::with_size(size(4))
            .with_rows(&["1...", "....", "....", "...."])
            .add_relation(Location(1, 0), SquareStep::Right, Relation::GreaterThan)
            .build()
            .unwrap();

        // row and column uniqueness
        assert!(!can_place_number(&board, Location(1, 0), 1));
        assert!(!can_place_number(&board, Location(0, 1), 1));
        assert!(can_place_number(&board, Location(1, 1), 1));
        // occupied, out of range, off the board
        assert!(!can_place_number(&board, Location(0, 0), 2));
        assert!(!can_place_number(&board, Location(1, 1), 0));
        assert!(!can_place_number(&board, Location(1, 1), 5));
        assert!(!can_place_number(&board, Location(4, 1), 1));

        // the relation waits for both ends to be filled
        assert!(can_place_number(&board, Location(1, 0), 2));
        board.apply(Move::Place { location: Location(2, 0), value: 3 }).unwrap();
        assert!(!can_place_number(&board, Location(1, 0), 2));
        assert!(can_place_number(&board, Location(1, 0), 4));
        assert_eq!(valid_numbers(&board, Location(1, 0)), vec![4]);
    }

    #[test]
    fn blocked_cells_do_not_count() {
        let board = LevelBuilder::with_size(size(3))
            .with_rows(&["#..", "...", "..."])
            .add_relation(Location(1, 0), SquareStep::Left, Relation::LessThan)
            .build()
            .unwrap();

        // the relation points at a blocked cell and never applies
        assert_eq!(valid_numbers(&board, Location(1, 0)), vec![1, 2, 3]);
        assert_eq!(valid_numbers(&board, Location(0, 0)), Vec::<u8>::new());
    }

    #[test]
    fn block_placement() {
        let board = LevelBuilder::preset(size(5)).build().unwrap();

        // touching the preset block
        assert!(!can_place_block(&board, Location(2, 0)));
        assert!(!can_place_block(&board, Location(1, 1)));
        assert!(!can_place_block(&board, Location(2, 1)));
        assert!(can_place_block(&board, Location(3, 0)));
        assert!(!can_place_block(&board, Location(2, 2)));
        assert!(can_place_block(&board, Location(4, 4)));

        let filled = level(&["1..", "...", "..."]);
        assert!(!can_place_block(&filled, Location(0, 0)));
    }

    #[test]
    fn corridor_cut_vertex() {
        let corridor = level(&["...", "###", "###"]);
        let structure = Structure::of(&corridor);

        assert_eq!(structure.articulation_points(), &HashSet::from([Location(1, 0)]));
        assert!(!structure.can_remove(Location(1, 0)));
        assert!(!can_place_block(&corridor, Location(1, 0)));
        assert!(structure.can_remove(Location(0, 0)));
    }

    #[test]
    fn snake_rejects_disconnecting_block() {
        let snake = level(&["...", "##.", "..."]);
        assert_eq!(format!("{}", snake), "...
##.
...
");

        // no blocked neighbor, but it is the only link between the top left and the rest
        assert!(block_fits_locally(&snake, Location(2, 0)));
        assert!(!can_place_block(&snake, Location(2, 0)));
        // the ends of the snake are not cut vertices, though both touch a block
        assert!(Structure::of(&snake).can_remove(Location(0, 0)));
        assert!(!can_place_block(&snake, Location(0, 0)));
        assert_eq!(
            Structure::of(&snake).articulation_points(),
            &HashSet::from([Location(1, 0), Location(2, 0), Location(2, 1), Location(2, 2), Location(1, 2)])
        );
    }

    #[test]
    fn articulation_points_match_brute_force() {
        let boards = [
            LevelBuilder::preset(size(5)).build().unwrap(),
            level(&["...", "##.", "..."]),
            level(&["....", ".#..", "...#", "#..."]),
            // already split in two
            level(&["..#.", "..#.", "###.", "...."]),
            level(&["#####", "#####", "#####", "#####", "#####"]),
            level(&["#....", ".#.#.", "..#..", ".#.#.", "....#"]),
        ];

        for board in boards {
            let structure = Structure::of(&board);
            assert_eq!(structure.articulation_points(), &brute_force_cut_vertices(&structure), "{}", board);
        }
    }

    #[test]
    fn articulation_points_ignore_start_order() {
        let board = level(&["#....", ".#.#.", "..#..", ".#.#.", "....#"]);
        let structure = Structure::of(&board);
        let nodes = structure.graph.nodes().collect_vec();

        let forward = articulation_points(&structure.graph, nodes.iter().copied());
        let backward = articulation_points(&structure.graph, nodes.iter().rev().copied());
        let rotated = articulation_points(&structure.graph, nodes.iter().cycle().skip(7).take(nodes.len()).copied());

        assert_eq!(forward, backward);
        assert_eq!(forward, rotated);
        assert_eq!(&forward, structure.articulation_points());
        // idempotent
        assert_eq!(Structure::of(&board).articulation_points(), structure.articulation_points());
    }

    #[test]
    fn structure_counts() {
        let split = level(&["..#.", "..#.", "###.", "...."]);
        let structure = Structure::of(&split);

        assert_eq!(structure.components(), 2);
        assert!(!structure.is_connected());
        assert!(!region_connected(&split));
        assert_eq!(structure.degree(Location(0, 0)), 2);
        assert_eq!(structure.degree(Location(3, 3)), 2);
        assert_eq!(structure.degree(Location(2, 0)), 0);

        let empty = level(&["###", "###", "###"]);
        assert!(region_connected(&empty));
        assert_eq!(Structure::of(&empty).components(), 0);
    }

    #[test]
    fn approved_blocks_keep_region_connected() {
        let mut board = LevelBuilder::with_size(size(6)).build().unwrap();

        // both sides' tokens and then some: keep blocking while the rules allow it
        loop {
            let Some(block) = legal_moves(&board, true).into_iter().find(Move::is_block) else { break };
            board.apply(block).unwrap();
            assert!(region_connected(&board), "{}", board);
        }

        for location in board.locations().collect_vec() {
            let before = board.clone();
            assert_eq!(board.apply(Move::Block { location }), Err(IllegalMove::Block { location }));
            assert_eq!(board, before);
        }
    }

    #[test]
    fn completion() {
        assert!(is_complete(&level(&["1234", "2143", "3412", "4321"])));
        assert!(is_complete(&level(&["#234", "2143", "3412", "4321"])));
        assert!(!is_complete(&level(&["1234", "2143", "3412", "432."])));
        // a repeat in the last column
        assert!(!is_complete(&level(&["1234", "2143", "3412", "4312"])));

        let violated = LevelBuilder::with_size(size(4))
            .with_rows(&["1234", "2143", "3412", "4321"])
            .add_relation(Location(0, 0), SquareStep::Right, Relation::GreaterThan)
            .build()
            .unwrap();
        assert!(!is_complete(&violated));
    }

    #[test]
    fn complete_boards_are_latin_and_respect_relations() {
        let board = LevelBuilder::with_size(size(4))
            .with_rows(&["1234", "2143", "3412", "4321"])
            .add_relation(Location(0, 0), SquareStep::Right, Relation::LessThan)
            .add_relation(Location(3, 3), SquareStep::Up, Relation::LessThan)
            .build()
            .unwrap();
        assert!(is_complete(&board));

        for (location, cell) in board.cells() {
            for (other, other_cell) in board.cells() {
                let shares_line = (location.0 == other.0) != (location.1 == other.1);
                if shares_line && !cell.is_blocked() && !other_cell.is_blocked() {
                    assert_ne!(cell.value(), other_cell.value());
                }
            }

            for direction in [SquareStep::Up, SquareStep::Down, SquareStep::Left, SquareStep::Right] {
                if let Some(relation) = cell.relation(direction) {
                    let (_, neighbor) = board.neighbor(location, direction).unwrap();
                    assert!(relation.holds(cell.value().unwrap(), neighbor.value().unwrap()));
                }
            }
        }
    }

    #[test]
    fn move_generation() {
        let board = LevelBuilder::preset(size(5)).build().unwrap();

        let with_token = legal_moves(&board, true);
        let without_token = legal_moves(&board, false);
        assert!(without_token.iter().all(|mv| !mv.is_block()));
        assert!(with_token.iter().all(|mv| mv.is_legal(&board)));
        assert_eq!(with_token.iter().filter(|mv| !mv.is_block()).count(), without_token.len());
        // relations only bite once both ends are filled
        assert_eq!(without_token.len(), 24 * 5);
        assert!(with_token.contains(&Move::Block { location: Location(4, 4) }));
        assert!(!with_token.contains(&Move::Block { location: Location(2, 0) }));

        let ranked = ranked_legal_moves(&board, true);
        assert_eq!(ranked.len(), with_token.len());
        let first_block = ranked.iter().position(Move::is_block).unwrap();
        assert!(ranked[first_block..].iter().all(Move::is_block));
        assert_eq!(ranked[0], Move::Place { location: Location(0, 0), value: 5 });
    }

    #[test]
    fn apply_and_reset() {
        let mut board = LevelBuilder::preset(size(5)).build().unwrap();
        let pristine = board.clone();

        assert_eq!(
            board.apply(Move::Place { location: Location(2, 1), value: 1 }),
            Err(IllegalMove::Place { location: Location(2, 1), value: 1 })
        );
        board.apply(Move::Place { location: Location(0, 0), value: 1 }).unwrap();
        board.apply(Move::Block { location: Location(4, 4) }).unwrap();
        assert_eq!(format!("{}", board), "1....
..#..
.....
.....
....#
");

        board.reset();
        assert_eq!(board, pristine);
    }

    #[test]
    fn scoped_moves_revert() {
        let mut board = LevelBuilder::preset(size(5)).build().unwrap();
        let before = board.clone();

        {
            let mut outer = board.scoped(Move::Block { location: Location(0, 0) });
            {
                let inner = outer.scoped(Move::Place { location: Location(4, 4), value: 3 });
                assert_eq!(inner.get(Location(4, 4)).unwrap().value(), Some(3));
                assert!(inner.get(Location(0, 0)).unwrap().is_blocked());
            }
            assert_eq!(outer.get(Location(4, 4)).unwrap().value(), None);
        }

        assert_eq!(board, before);
    }

    #[test]
    fn tokens_and_status() {
        let tokens = Tokens::default();
        assert_eq!(tokens.after(Move::Place { location: Location(0, 0), value: 1 }), tokens);
        assert_eq!(
            tokens.after(Move::Block { location: Location(0, 0) }),
            Tokens { acting: false, opposing: true }
        );
        assert_eq!(Tokens { acting: false, opposing: true }.swapped(), Tokens { acting: true, opposing: false });

        assert_eq!(assess(&level(&["123", "231", "312"]), tokens), Status::Complete);
        assert_eq!(assess(&level(&["...", "...", "..."]), tokens), Status::Ongoing);
        // the open corner can take nothing, and without a token there is nothing else to do
        let stuck = level(&["12.", "3##", "##3"]);
        assert_eq!(valid_numbers(&stuck, Location(2, 0)), Vec::<u8>::new());
        assert_eq!(assess(&stuck, Tokens { acting: false, opposing: true }), Status::Stuck);
    }

    #[test]
    fn greedy_resolves_dead_cell() {
        let mut board = level(&["123.", "...4", "....", "...."]);
        assert_eq!(valid_numbers(&board, Location(3, 0)), Vec::<u8>::new());
        let structure = Structure::of(&board);

        for mv in legal_moves(&board, true) {
            let score = greedy::evaluate(&mut board, mv, &structure);
            if mv == (Move::Block { location: Location(3, 0) }) {
                assert!(score.is_finite());
            } else {
                assert_eq!(score, f64::NEG_INFINITY, "{:?}", mv);
            }
        }

        let config = GreedyConfig::default();
        assert_eq!(greedy::select(&mut board, true, &config), Some(Move::Block { location: Location(3, 0) }));

        // with nothing that helps, the least bad move is still played
        let fallback = greedy::select(&mut board, false, &config).unwrap();
        assert!(!fallback.is_block());
        assert!(fallback.is_legal(&board));
    }

    #[test]
    fn greedy_prefers_numbers_and_respects_regions() {
        let mut board = LevelBuilder::preset(size(5)).build().unwrap();
        let before = board.clone();
        let config = GreedyConfig::default();

        let chosen = greedy::select(&mut board, true, &config).unwrap();
        assert!(!chosen.is_block());
        assert!(chosen.is_legal(&board));
        assert_eq!(board, before);
        // reproducible for a fixed seed
        assert_eq!(greedy::select(&mut board, true, &config), Some(chosen));

        let corner = greedy::select_in(&mut board, true, &config, |location| location == Location(4, 0)).unwrap();
        assert_eq!(corner.location(), Location(4, 0));

        let filled = &mut level(&["1..", "...", "..."]);
        assert_eq!(greedy::select_in(filled, true, &config, |location| location == Location(0, 0)), None);
    }

    #[test]
    fn greedy_candidate_cap() {
        let mut board = LevelBuilder::with_size(size(6)).build().unwrap();
        let config = GreedyConfig { candidate_cap: 10, ..GreedyConfig::default() };

        let chosen = greedy::select(&mut board, true, &config).unwrap();
        // only the ten places nearest the center survive the cap
        assert!(!chosen.is_block());
        assert!(chosen.location().center_distance(board.size()) <= 1.0);
    }

    #[test]
    fn quadrants_cover_the_board() {
        let parts = quadrant::quadrants(size(5));
        assert_eq!(parts[0], Quadrant { xs: 0..2, ys: 0..2 });
        assert_eq!(parts[3], Quadrant { xs: 2..5, ys: 2..5 });

        let board = LevelBuilder::with_size(size(5)).build().unwrap();
        for location in board.locations() {
            assert_eq!(parts.iter().filter(|quadrant| quadrant.contains(location)).count(), 1);
        }
    }

    #[test]
    fn quadrant_selection() {
        let config = GreedyConfig::default();

        let mut small = LevelBuilder::with_size(size(3)).build().unwrap();
        let expected = greedy::select(&mut small, true, &config);
        assert_eq!(quadrant::select(&mut small, true, &config), expected);

        let mut board = LevelBuilder::preset(size(6)).build().unwrap();
        let before = board.clone();
        let chosen = quadrant::select(&mut board, true, &config).unwrap();
        assert!(!chosen.is_block());
        assert!(chosen.is_legal(&board));
        assert_eq!(board, before);

        let mut full = board_from_latin();
        assert_eq!(quadrant::select(&mut full, true, &config), None);
    }

    fn board_from_latin() -> Board {
        level(&["1234", "2143", "3412", "4321"])
    }

    #[test]
    fn adversarial_places_on_empty_board() {
        let mut board = LevelBuilder::with_size(size(4)).build().unwrap();
        let config = AdversarialConfig { depth: NonZero::new(2).unwrap(), ..AdversarialConfig::default() };

        let chosen = adversarial::select(&mut board, Tokens::default(), &config).unwrap();
        assert!(!chosen.is_block());
        assert!(chosen.is_legal(&board));
    }

    #[test]
    fn adversarial_is_deterministic() {
        let mut board = LevelBuilder::preset(size(5)).build().unwrap();
        let before = board.clone();
        let config = shallow();

        let first = adversarial::select(&mut board, Tokens::default(), &config);
        let first_score = adversarial::score(&mut board, Tokens::default(), &config);
        assert_eq!(board, before);
        assert_eq!(adversarial::select(&mut board, Tokens::default(), &config), first);
        assert_eq!(adversarial::score(&mut board, Tokens::default(), &config), first_score);
    }

    #[test]
    fn adversarial_finds_the_win() {
        // either number leaves the other open cell without a value that satisfies its relation
        let mut board = LevelBuilder::with_size(size(3))
            .with_rows(&["123", "231", "3.."])
            .add_relation(Location(2, 2), SquareStep::Left, Relation::LessThan)
            .build()
            .unwrap();
        let tokens = Tokens { acting: false, opposing: false };

        assert_eq!(legal_moves(&board, false).len(), 2);
        assert_eq!(adversarial::score(&mut board, tokens, &shallow()), Some(LOSS - 1));
        assert_eq!(
            adversarial::select(&mut board, tokens, &shallow()),
            Some(Move::Place { location: Location(2, 2), value: 2 })
        );
    }

    #[test]
    fn adversarial_without_moves() {
        let mut full = board_from_latin();
        assert_eq!(adversarial::select(&mut full, Tokens::default(), &shallow()), None);
    }

    #[test]
    fn strategies_return_legal_moves_and_restore_the_board() {
        let strategies = [
            Strategy::default(),
            Strategy::Quadrant(GreedyConfig::default()),
            Strategy::Adversarial(shallow()),
        ];

        for strategy in strategies {
            for tokens in [Tokens::default(), Tokens { acting: false, opposing: true }] {
                let mut board = LevelBuilder::preset(size(5)).build().unwrap();
                board.apply(Move::Place { location: Location(2, 2), value: 3 }).unwrap();
                let before = board.clone();

                let chosen = strategy.select_move(&mut board, tokens).unwrap();
                assert_eq!(board, before);
                assert!(chosen.is_legal(&board), "{:?} chose {:?}", strategy, chosen);
                assert!(tokens.acting || !chosen.is_block());
            }
        }
    }

    #[test]
    fn self_play_ends_with_a_result() {
        let mut board = LevelBuilder::preset(size(5)).build().unwrap();
        let strategies = [Strategy::default(), Strategy::Quadrant(GreedyConfig::default())];
        let mut tokens = Tokens::default();
        let mut turn = 0;

        loop {
            match assess(&board, tokens) {
                Status::Ongoing => {}
                _ => break,
            }

            let mv = strategies[turn % 2].select_move(&mut board, tokens).unwrap();
            board.apply(mv).unwrap();
            assert!(region_connected(&board));
            tokens = tokens.after(mv).swapped();
            turn += 1;
            assert!(turn <= 25);
        }
    }
}
