//! Тесты оценки рук.
//!
//! Здесь мы проверяем:
//! - категории и порядок карт в лучшей руке;
//! - стрит на борде делится (сценарий A);
//! - wheel ниже стрита до шестёрки;
//! - каре всегда сильнее фулл-хауса;
//! - разницу правил Standard / Legacy;
//! - подсветку рук для клиента.

mod common;

use std::cmp::Ordering;

use common::c;
use holdem_cash_engine::domain::card::{parse_cards, Card, Rank, Suit};
use holdem_cash_engine::eval::{
    compare_hands, evaluate_best_hand, highlight_for_player, EvaluatedHand, HandCategory,
    TieBreakRule,
};

use Rank::*;
use Suit::*;

fn eval(s: &str) -> EvaluatedHand {
    let cards = parse_cards(s).expect("карты должны парситься");
    evaluate_best_hand(&cards).expect("5..=7 карт")
}

//
// ===== КАТЕГОРИИ =====
//

#[test]
fn categories_have_client_names() {
    let cases = [
        ("Ah Kh Qh Jh Th 2c 3d", "Royal Flush"),
        ("9s 8s 7s 6s 5s Ad Ac", "Straight Flush"),
        ("7c 7d 7h 7s 2c 3d 9h", "Four of a kind"),
        ("Kc Kd Kh 4s 4c 2d 9h", "Full House"),
        ("Ac 9c 7c 4c 2c Kd Qh", "Flush"),
        ("9d Tc Jh Qs Kd 2c 2d", "Straight"),
        ("5c 5d 5h Ks 9c 2d 3h", "Three of a kind"),
        ("Jc Jd 4h 4s Ac 2d 9h", "2 Pair"),
        ("Tc Td 4h 8s Ac 2d 9h", "1 Pair"),
        ("Ac Jd 4h 8s 6c 2d 9h", "High Card"),
    ];
    for (cards, name) in cases {
        assert_eq!(eval(cards).name(), name, "рука {cards}");
    }
}

#[test]
fn made_hand_cards_are_ordered_by_significance() {
    let two_pair = eval("4h Jc 4s Jd Ac 2d 9h");
    assert_eq!(
        two_pair.ranks(),
        [Jack, Jack, Four, Four, Ace],
        "Старшая пара, младшая пара, затем кикер"
    );

    let pair = eval("Tc Td 4h 8s Ac 2d 9h");
    assert_eq!(pair.ranks(), [Ten, Ten, Ace, Nine, Eight]);

    let full = eval("Kc Kd Kh 4s 4c 4d 9h");
    assert_eq!(full.category, HandCategory::FullHouse);
    assert_eq!(full.ranks(), [King, King, King, Four, Four], "Второй сет даёт пару фулла");
}

#[test]
fn evaluation_is_deterministic() {
    let cards = parse_cards("Qs 7d Qh 2c 9s 7c Ad").unwrap();
    let first = evaluate_best_hand(&cards).unwrap();
    for _ in 0..10 {
        assert_eq!(evaluate_best_hand(&cards).unwrap(), first);
    }

    let mut reversed = cards.clone();
    reversed.reverse();
    assert_eq!(
        evaluate_best_hand(&reversed).unwrap().ranks(),
        first.ranks(),
        "Порядок входа не влияет на результат"
    );
}

#[test]
fn evaluator_rejects_wrong_card_count() {
    let four = [c(Ace, Spades), c(King, Spades), c(Queen, Spades), c(Jack, Spades)];
    assert!(evaluate_best_hand(&four).is_none());
}

//
// ===== СЦЕНАРИЙ A: СТРИТ НА БОРДЕ =====
//

#[test]
fn board_straight_is_split() {
    let board = [c(Two, Diamonds), c(Three, Diamonds), c(Four, Spades), c(Five, Spades), c(Six, Spades)];

    let mut p1: Vec<Card> = vec![c(King, Clubs), c(Queen, Spades)];
    p1.extend_from_slice(&board);
    let mut p2: Vec<Card> = vec![c(Nine, Diamonds), c(Ten, Diamonds)];
    p2.extend_from_slice(&board);

    let h1 = evaluate_best_hand(&p1).unwrap();
    let h2 = evaluate_best_hand(&p2).unwrap();

    assert_eq!(h1.name(), "Straight");
    assert_eq!(h2.name(), "Straight");
    assert_eq!(h1.ranks(), [Six, Five, Four, Three, Two]);
    for rule in [TieBreakRule::Standard, TieBreakRule::Legacy] {
        assert_eq!(compare_hands(&h1, &h2, rule), Ordering::Equal, "Делёж при {rule:?}");
    }
}

//
// ===== WHEEL =====
//

#[test]
fn wheel_is_lowest_straight() {
    let wheel = eval("Ac 2d 3h 4s 5c");
    let six_high = eval("2c 3d 4h 5s 6c");

    assert_eq!(wheel.category, HandCategory::Straight);
    assert_eq!(wheel.ranks(), [Five, Four, Three, Two, Ace], "Туз в wheel идёт последним");

    for rule in [TieBreakRule::Standard, TieBreakRule::Legacy] {
        assert_eq!(compare_hands(&wheel, &six_high, rule), Ordering::Less);
        assert_eq!(compare_hands(&six_high, &wheel, rule), Ordering::Greater);
    }
}

#[test]
fn steel_wheel_is_straight_flush() {
    let hand = eval("Ah 2h 3h 4h 5h Kd Kc");
    assert_eq!(hand.category, HandCategory::StraightFlush);
    assert_eq!(hand.cards[0], c(Five, Hearts));
}

//
// ===== КАРЕ ПРОТИВ ФУЛЛ-ХАУСА =====
//

#[test]
fn quads_always_beat_full_house() {
    for quad in Rank::ALL {
        let kicker = if quad == Ace { King } else { Ace };
        let quads = [
            c(quad, Clubs),
            c(quad, Diamonds),
            c(quad, Hearts),
            c(quad, Spades),
            c(kicker, Clubs),
        ];
        let quads = evaluate_best_hand(&quads).unwrap();
        assert_eq!(quads.category, HandCategory::FourOfAKind);

        for trips in Rank::ALL {
            for pair in Rank::ALL.into_iter().filter(|r| *r != trips) {
                let full = [
                    c(trips, Clubs),
                    c(trips, Diamonds),
                    c(trips, Hearts),
                    c(pair, Spades),
                    c(pair, Clubs),
                ];
                let full = evaluate_best_hand(&full).unwrap();
                assert_eq!(full.category, HandCategory::FullHouse);

                for rule in [TieBreakRule::Standard, TieBreakRule::Legacy] {
                    assert_eq!(
                        compare_hands(&quads, &full, rule),
                        Ordering::Greater,
                        "каре {quad:?} против фулла {trips:?}/{pair:?}"
                    );
                }
            }
        }
    }
}

//
// ===== ПРАВИЛА НИЧЬИХ =====
//

#[test]
fn legacy_rule_splits_flushes_standard_does_not() {
    let ace_flush = eval("Ac 9c 7c 4c 2c");
    let king_flush = eval("Kc Jc 7c 4c 2c");

    assert_eq!(compare_hands(&ace_flush, &king_flush, TieBreakRule::Standard), Ordering::Greater);
    assert_eq!(
        compare_hands(&ace_flush, &king_flush, TieBreakRule::Legacy),
        Ordering::Equal,
        "Legacy сравнивает флеши только по категории"
    );
}

#[test]
fn both_rules_use_kickers_for_pairs() {
    let ace_kicker = eval("Tc Td Ah 8s 3c");
    let king_kicker = eval("Th Ts Kh 8d 3d");

    for rule in [TieBreakRule::Standard, TieBreakRule::Legacy] {
        assert_eq!(compare_hands(&ace_kicker, &king_kicker, rule), Ordering::Greater);
    }
}

#[test]
fn tie_break_rule_parses_from_config_strings() {
    assert_eq!("legacy".parse::<TieBreakRule>().unwrap(), TieBreakRule::Legacy);
    assert_eq!(" Standard ".parse::<TieBreakRule>().unwrap(), TieBreakRule::Standard);
    assert!("kicker".parse::<TieBreakRule>().is_err());
}

//
// ===== ПОДСВЕТКА =====
//

#[test]
fn highlight_preflop_uses_hole_cards_only() {
    let high = highlight_for_player(&[], [c(King, Spades), c(Nine, Hearts)]);
    assert_eq!(high.label, "K high");
    assert!(high.cards.is_empty(), "Старшая карта не подсвечивается");

    let pocket = highlight_for_player(&[], [c(Seven, Spades), c(Seven, Hearts)]);
    assert_eq!(pocket.label, "1 Pair");
    assert_eq!(pocket.cards.len(), 2);
}

#[test]
fn highlight_on_flop_marks_made_cards() {
    let flop = [c(Jack, Clubs), c(Four, Hearts), c(Jack, Diamonds)];

    let trips = highlight_for_player(&flop, [c(Jack, Spades), c(Two, Hearts)]);
    assert_eq!(trips.label, "Three of a kind");
    assert_eq!(trips.cards.len(), 3);
    assert!(trips.cards.iter().all(|card| card.rank == Jack));

    let two_pair = highlight_for_player(&flop, [c(Four, Spades), c(Ace, Hearts)]);
    assert_eq!(two_pair.label, "2 Pair");
    assert_eq!(two_pair.cards.len(), 4);
}

#[test]
fn highlight_straight_marks_five_cards() {
    let board = [c(Five, Clubs), c(Six, Hearts), c(Seven, Diamonds), c(King, Clubs)];
    let h = highlight_for_player(&board, [c(Eight, Spades), c(Nine, Hearts)]);
    assert_eq!(h.label, "Straight");
    assert_eq!(h.cards.len(), 5);
}
