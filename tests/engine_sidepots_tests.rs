//! Side pot / showdown тесты.
//!
//! Здесь мы проверяем:
//! - раскладку вкладов на главный пот и сайд-поты;
//! - сохранение фишек (сумма потов = сумма вкладов);
//! - сценарий B: all-in 100 против 300 при сброшенном третьем;
//! - делёж банка при стрите на борде (сценарий A через движок).

mod common;

use common::{c, StackedRng, TestTable};
use holdem_cash_engine::domain::{
    card::{Rank, Suit},
    chips::Chips,
    outcome::Outcome,
    SidePot,
};
use holdem_cash_engine::engine::{allocate_pots, compute_side_pots, PlayerAction, RaiseKind};

use Rank::*;
use Suit::*;

//
// ====================== PotAllocator ======================
//

#[test]
fn equal_contributions_make_single_main_pot() {
    let alloc = compute_side_pots(&[(1, Chips(100)), (2, Chips(100))]);

    assert_eq!(alloc.main_pot, Chips(200));
    assert_eq!(alloc.main_eligible, vec![1, 2]);
    assert!(alloc.side_pots.is_empty(), "Не должно быть лишних потов");
}

#[test]
fn three_all_ins_make_layered_pots() {
    let alloc = compute_side_pots(&[(1, Chips(100)), (2, Chips(200)), (3, Chips(300))]);

    assert_eq!(alloc.main_pot, Chips(300));
    assert_eq!(alloc.main_eligible, vec![1, 2, 3]);
    assert_eq!(
        alloc.side_pots,
        vec![
            SidePot { amount: Chips(200), eligible: vec![2, 3] },
            SidePot { amount: Chips(100), eligible: vec![3] },
        ]
    );
}

/// Сценарий B на уровне аллокатора: 100 и 300.
#[test]
fn scenario_b_allocation() {
    let alloc = compute_side_pots(&[(1, Chips(100)), (2, Chips(300))]);

    assert_eq!(alloc.main_pot, Chips(200), "Главный пот = 100 × 2");
    assert_eq!(alloc.main_eligible, vec![1, 2]);
    assert_eq!(alloc.side_pots, vec![SidePot { amount: Chips(200), eligible: vec![2] }]);
}

#[test]
fn folded_chips_below_first_level_go_to_main_pot() {
    let alloc = allocate_pots(&[(1, Chips(50)), (2, Chips(80))], &[Chips(20)]);
    assert_eq!(alloc.main_pot, Chips(120));
    assert_eq!(alloc.main_eligible, vec![1, 2], "Сбросивший ни на что не претендует");
    assert_eq!(alloc.total(), Chips(150));
    assert_eq!(alloc.pots().len(), 2);
}

#[test]
fn folded_chips_are_layered_like_live_ones() {
    // Короткий all-in на 50, второй поставил 300, сбросивший – 200.
    let alloc = allocate_pots(&[(1, Chips(50)), (2, Chips(300))], &[Chips(200)]);

    assert_eq!(alloc.main_pot, Chips(150), "В главный пот сбросивший кладёт не больше 50");
    assert_eq!(alloc.main_eligible, vec![1, 2]);
    assert_eq!(
        alloc.side_pots,
        vec![SidePot { amount: Chips(400), eligible: vec![2] }],
        "Остаток сбросившего уходит в сайд-пот"
    );
    assert_eq!(alloc.total(), Chips(550));
}

#[test]
fn folded_chips_spread_over_several_levels() {
    let alloc = allocate_pots(
        &[(1, Chips(100)), (2, Chips(200)), (3, Chips(300))],
        &[Chips(150), Chips(40)],
    );

    assert_eq!(alloc.main_pot, Chips(300 + 100 + 40));
    assert_eq!(
        alloc.side_pots,
        vec![
            SidePot { amount: Chips(200 + 50), eligible: vec![2, 3] },
            SidePot { amount: Chips(100), eligible: vec![3] },
        ]
    );
    assert_eq!(alloc.total(), Chips(790), "Сохранение фишек");
}

#[test]
fn allocation_conserves_chips() {
    let inputs: Vec<Vec<u64>> = vec![
        vec![10, 10, 10],
        vec![5, 17, 17, 90],
        vec![1, 2, 3, 4, 5, 6],
        vec![1000, 1],
        vec![0, 40, 40],
        vec![250],
    ];
    for bets in inputs {
        let contributions: Vec<(u64, Chips)> = bets
            .iter()
            .enumerate()
            .map(|(i, b)| (i as u64 + 1, Chips(*b)))
            .collect();
        let alloc = compute_side_pots(&contributions);
        let total: u64 = bets.iter().sum();
        assert_eq!(alloc.total(), Chips(total), "Фишки не теряются: {bets:?}");
    }
}

//
// ====================== СЦЕНАРИЙ B ЧЕРЕЗ ДВИЖОК ======================
//

#[test]
fn scenario_b_short_all_in_with_folded_third() {
    // Места: 0 – кнопка (100), 1 – SB (300), 2 – BB (1000).
    let (mut t, players) = TestTable::with_stacks(&[100, 300, 1_000]);
    let (short, big, third) = (players[0], players[1], players[2]);

    let mut rng = StackedRng::new(
        &[
            (c(Ace, Hearts), c(Ace, Spades)),
            (c(King, Hearts), c(King, Spades)),
            (c(Queen, Clubs), c(Queen, Diamonds)),
        ],
        [c(Two, Clubs), c(Seven, Diamonds), c(Nine, Hearts), c(Jack, Spades), c(Three, Clubs)],
    );
    t.start(&mut rng);
    let before = t.total_stacks() + t.arena.current_match().unwrap().pot;

    assert_eq!(t.on_turn(), Some(short), "При трёх игроках первой ходит кнопка");
    t.act(PlayerAction::raise(t.pid(short), Chips::ZERO, RaiseKind::AllIn)).unwrap();
    t.act(PlayerAction::raise(t.pid(big), Chips::ZERO, RaiseKind::AllIn)).unwrap();
    t.act(PlayerAction::fold(t.pid(third))).unwrap();

    let m = t.arena.current_match().unwrap();
    assert!(m.settled, "Торговля окончена, борд докладывается");
    assert!(m.is_all_all_in);
    assert_eq!(m.pot, Chips(420));
    assert_eq!(m.main_pot, Chips(220), "200 + 20 мёртвых денег большого блайнда");
    assert_eq!(
        m.side_pots,
        vec![SidePot { amount: Chips(200), eligible: vec![t.pid(big)] }]
    );
    assert_eq!(m.rake, Chips(11), "5% только с главного пота");

    assert_eq!(t.stack(short), Chips(209));
    assert_eq!(t.stack(big), Chips(200), "Излишек возвращается большому стеку");
    assert_eq!(t.stack(third), Chips(980));
    assert_eq!(t.total_stacks() + m.rake, before, "Сохранение фишек");

    let outcomes: Vec<&Outcome> = t.arena.outcomes_of(m.id).collect();
    assert_eq!(outcomes.len(), 3);
    match outcomes.iter().find(|o| o.player_id() == short) {
        Some(Outcome::Win(w)) => {
            assert_eq!(w.amount, Chips(109));
            assert_eq!(w.hand_name.as_deref(), Some("1 Pair"));
        }
        other => panic!("Ожидался выигрыш короткого стека, получили {other:?}"),
    }
    assert!(matches!(
        outcomes.iter().find(|o| o.player_id() == big),
        Some(Outcome::Lose(l)) if l.amount == Chips(100)
    ));
}

#[test]
fn folded_raiser_does_not_inflate_short_all_in_pot() {
    // Места: 0 – кнопка (50), 1 – SB (1000), 2 – BB (1000).
    let (mut t, players) = TestTable::with_stacks(&[50, 1_000, 1_000]);
    let (short, sb, bb) = (players[0], players[1], players[2]);

    let mut rng = StackedRng::new(
        &[
            (c(Ace, Hearts), c(Ace, Spades)),
            (c(King, Hearts), c(King, Spades)),
            (c(Queen, Clubs), c(Queen, Diamonds)),
        ],
        [c(Two, Clubs), c(Seven, Diamonds), c(Nine, Hearts), c(Jack, Spades), c(Three, Clubs)],
    );
    t.start(&mut rng);
    let before = t.total_stacks() + t.arena.current_match().unwrap().pot;

    // Префлоп: кнопка all-in на 50, SB поднимает до 200, BB коллирует.
    t.act(PlayerAction::raise(t.pid(short), Chips::ZERO, RaiseKind::AllIn)).unwrap();
    t.act(PlayerAction::raise(t.pid(sb), Chips(200), RaiseKind::Raise)).unwrap();
    t.act(PlayerAction::call(t.pid(bb))).unwrap();

    // Флоп: SB ставит 100, BB сбрасывает.
    t.act(PlayerAction::raise(t.pid(sb), Chips(100), RaiseKind::Raise)).unwrap();
    t.act(PlayerAction::fold(t.pid(bb))).unwrap();

    let m = t.arena.current_match().unwrap();
    assert!(m.settled);
    assert_eq!(m.pot, Chips(550));
    assert_eq!(m.main_pot, Chips(150), "Короткий стек претендует только на 50 × 3");
    assert_eq!(
        m.side_pots,
        vec![SidePot { amount: Chips(400), eligible: vec![t.pid(sb)] }]
    );
    assert_eq!(m.rake, Chips(7), "5% с главного пота, округление вниз");

    assert_eq!(t.stack(short), Chips(143));
    assert_eq!(t.stack(sb), Chips(1_100));
    assert_eq!(t.stack(bb), Chips(800));
    assert_eq!(t.total_stacks() + m.rake, before, "Сохранение фишек");
}

//
// ====================== СЦЕНАРИЙ A ЧЕРЕЗ ДВИЖОК ======================
//

#[test]
fn scenario_a_board_straight_splits_pot() {
    let (mut t, players) = TestTable::with_stacks(&[1_000, 1_000]);
    let (p1, p2) = (players[0], players[1]);

    let mut rng = StackedRng::new(
        &[
            (c(King, Clubs), c(Queen, Spades)),
            (c(Nine, Diamonds), c(Ten, Diamonds)),
        ],
        [c(Two, Diamonds), c(Three, Diamonds), c(Four, Spades), c(Five, Spades), c(Six, Spades)],
    );
    t.start(&mut rng);

    // Хедз-ап: кнопка ставит малый блайнд и ходит первой.
    assert_eq!(t.arena.current_match().unwrap().small_blind_id, p1);
    t.act(PlayerAction::call(t.pid(p1))).unwrap();
    t.act(PlayerAction::check(t.pid(p2))).unwrap();

    // Флоп, тёрн, ривер: первым ходит игрок после кнопки.
    for _ in 0..3 {
        assert_eq!(t.on_turn(), Some(p2));
        t.act(PlayerAction::check(t.pid(p2))).unwrap();
        t.act(PlayerAction::check(t.pid(p1))).unwrap();
    }

    let m = t.arena.current_match().unwrap();
    assert!(m.settled);
    assert_eq!(m.pot, Chips(40));
    assert_eq!(m.rake, Chips(2));
    assert_eq!(m.winners.len(), 2, "Делёж: оба победители");
    assert_eq!(t.stack(p1), Chips(999));
    assert_eq!(t.stack(p2), Chips(999));
}

#[test]
fn odd_chip_goes_left_of_button() {
    // Три игрока, стрит на борде, без рейка; делят двое, банк нечётный.
    let (mut t, players) = TestTable::with_stacks(&[1_000, 1_000, 1_000]);
    t.settings.service_fee_bps = 0;
    let (button, sb, bb) = (players[0], players[1], players[2]);

    let mut rng = StackedRng::new(
        &[
            (c(Two, Clubs), c(Three, Clubs)),
            (c(Two, Hearts), c(Three, Hearts)),
            (c(Two, Spades), c(Three, Spades)),
        ],
        [c(Ten, Diamonds), c(Jack, Clubs), c(Queen, Hearts), c(King, Spades), c(Ace, Diamonds)],
    );
    t.start(&mut rng);

    // Префлоп: кнопка поднимает до 41, блайнды доливают.
    t.act(PlayerAction::raise(t.pid(button), Chips(41), RaiseKind::Raise)).unwrap();
    t.act(PlayerAction::call(t.pid(sb))).unwrap();
    t.act(PlayerAction::call(t.pid(bb))).unwrap();
    assert_eq!(t.arena.current_match().unwrap().pot, Chips(123));

    // Флоп: SB ставит 20, BB коллирует, кнопка сбрасывает.
    t.act(PlayerAction::raise(t.pid(sb), Chips(20), RaiseKind::Raise)).unwrap();
    t.act(PlayerAction::call(t.pid(bb))).unwrap();
    t.act(PlayerAction::fold(t.pid(button))).unwrap();

    // Тёрн и ривер в чек.
    for _ in 0..2 {
        t.act(PlayerAction::check(t.pid(sb))).unwrap();
        t.act(PlayerAction::check(t.pid(bb))).unwrap();
    }

    let m = t.arena.current_match().unwrap();
    assert!(m.settled);
    assert_eq!(m.pot, Chips(163));
    assert_eq!(m.rake, Chips::ZERO);
    assert_eq!(t.stack(sb), Chips(1_000 - 61 + 82), "Нечётная фишка – первому слева от кнопки");
    assert_eq!(t.stack(bb), Chips(1_000 - 61 + 81));
    assert_eq!(t.stack(button), Chips(959));
    assert_eq!(t.total_stacks(), Chips(3_000));
}
