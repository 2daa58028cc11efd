//! End-to-end chordset scenarios driven by raw host key codes.

use std::cell::RefCell;
use std::rc::Rc;

use crafty_core::chord::{Chord, ChordBinding, MouseButton, create_help_message, Trigger};
use crafty_core::chordset::Chordset;
use crafty_core::event::{Activation, Enacted};
use crafty_core::geometry::Point;
use crafty_core::keys::{Key, Modifiers, Platform};

type Log = Rc<RefCell<Vec<String>>>;

fn logging(log: &Log) -> impl FnMut(&ChordBinding, &Activation) -> Enacted<String> + 'static {
    let log = Rc::clone(log);
    move |binding, _| {
        log.borrow_mut().push(binding.cmd().to_owned());
        Enacted::transition(binding.cmd().to_owned())
    }
}

mod win {
    pub const A: u32 = 0x41;
    pub const B: u32 = 0x42;
    pub const CTRL: u32 = 0x11;
    pub const SHIFT: u32 = 0x10;
    pub const ESC: u32 = 0x1B;
}

mod mac {
    pub const A: u32 = 0x00;
    pub const B: u32 = 0x0B;
    pub const CMD: u32 = 0x37;
}

#[test]
fn two_step_sequence_fires_on_final_release() {
    let log = Log::default();
    let mut set = Chordset::for_platform(
        Platform::Windows,
        [Chord::on_keys("ab", "A then B", [[Key::Char('A')], [Key::Char('B')]], logging(&log)).unwrap()],
    );

    assert!(set.on_key_down(win::A));
    assert!(set.on_key_up(win::A).transition.is_none());
    assert!(set.on_key_down(win::B));
    assert!(log.borrow().is_empty(), "chords fire on release, not press");
    let out = set.on_key_up(win::B);
    assert_eq!(out.transition.as_deref(), Some("ab"));
    assert!(set.state().is_idle());
    assert_eq!(*log.borrow(), ["ab"]);
}

#[test]
fn two_step_sequence_on_mac_codes() {
    let log = Log::default();
    let mut set = Chordset::for_platform(
        Platform::Mac,
        [Chord::on_keys("ab", "", [[Key::Char('A')], [Key::Char('B')]], logging(&log))
            .unwrap()
            .with_modifiers(Modifiers::CTRL_CMD)],
    );
    set.on_key_down(mac::CMD);
    set.on_key_down(mac::A);
    let _ = set.on_key_up(mac::A);
    set.on_key_down(mac::B);
    let out = set.on_key_up(mac::B);
    assert_eq!(out.transition.as_deref(), Some("ab"));
}

#[test]
fn sequence_broken_by_wrong_second_key() {
    let log = Log::default();
    let mut set = Chordset::for_platform(
        Platform::Windows,
        [Chord::on_keys("ab", "", [[Key::Char('A')], [Key::Char('B')]], logging(&log)).unwrap()],
    );
    set.on_key_down(win::A);
    let _ = set.on_key_up(win::A);
    set.on_key_down(win::ESC);
    assert!(set.state().is_dead_end());
    let _ = set.on_key_up(win::ESC);
    assert!(set.state().is_idle());
    assert!(log.borrow().is_empty());
}

#[test]
fn ctrl_a_is_an_exact_modifier_match() {
    let log = Log::default();
    let mut set = Chordset::for_platform(
        Platform::Windows,
        [Chord::on_keys("all", "Select all", [[Key::Char('A')]], logging(&log))
            .unwrap()
            .with_modifiers(Modifiers::CTRL_CMD)],
    );

    // A alone.
    set.on_key_down(win::A);
    let _ = set.on_key_up(win::A);
    // Ctrl+Shift+A.
    set.on_key_down(win::CTRL);
    set.on_key_down(win::SHIFT);
    set.on_key_down(win::A);
    let _ = set.on_key_up(win::A);
    let _ = set.on_key_up(win::SHIFT);
    let _ = set.on_key_up(win::CTRL);
    assert!(log.borrow().is_empty());

    // Ctrl+A.
    set.on_key_down(win::CTRL);
    set.on_key_down(win::A);
    let out = set.on_key_up(win::A);
    assert!(out.handled);
    assert_eq!(*log.borrow(), ["all"]);
}

#[test]
fn click_while_key_held_dead_ends() {
    let log = Log::default();
    let mut set = Chordset::for_platform(
        Platform::Windows,
        [
            Chord::on_click(MouseButton::Left, "pick", "Pick", logging(&log)),
            Chord::on_keys("a", "", [[Key::Char('A')]], logging(&log)).unwrap(),
        ],
    );
    set.on_key_down(win::A);
    let out = set.on_click(MouseButton::Left, Point::new(5.0, 5.0));
    assert!(set.state().is_dead_end());
    assert!(out.transition.is_none());
    let _ = set.on_key_up(win::A);
    assert!(set.state().is_idle());
    assert!(log.borrow().is_empty());

    let out = set.on_click(MouseButton::Left, Point::new(5.0, 5.0));
    assert_eq!(out.transition.as_deref(), Some("pick"));
}

#[test]
fn help_message_for_ctrl_left_click() {
    let msg = create_help_message(
        "Pick",
        Modifiers::CTRL_CMD,
        &Trigger::Click(MouseButton::Left),
        Platform::Windows,
    );
    assert_eq!(msg, "[Ctrl + Left Click] Pick");
}

#[test]
fn status_joins_every_enabled_chord() {
    let mut set: Chordset<()> = Chordset::for_platform(Platform::Mac, std::iter::empty())
        .with_chord(
            Chord::on_click(MouseButton::Left, "pick", "Pick", |_, _| Enacted::handled())
                .with_modifiers(Modifiers::CTRL_CMD),
        )
        .with_chord(
            Chord::on_keys("esc", "Cancel", [[Key::Escape]], |_, _| Enacted::handled()).unwrap(),
        );
    assert_eq!(set.status(), "[⌘ + Left Click] Pick // [Escape] Cancel");
    set.disable("esc");
    assert_eq!(set.status(), "[⌘ + Left Click] Pick");
}
