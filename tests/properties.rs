use std::sync::Arc;

use chip8::{Chip8Interpreter, Config, Framebuffer, InputState, Timers};
use proptest::prelude::*;

fn alu(opcode: u16, a: u8, b: u8) -> Chip8Interpreter {
    let mut m = Chip8Interpreter::new(Arc::new(InputState::new()), &Config::default());
    m.load_program_bytes(&opcode.to_be_bytes()).unwrap();
    m.set_register(0x1, a);
    m.set_register(0x2, b);
    m.step().unwrap();
    m
}

proptest! {
    #[test]
    fn add_sets_carry_iff_sum_overflows(a in any::<u8>(), b in any::<u8>()) {
        let m = alu(0x8124, a, b);
        prop_assert_eq!(m.register(0x1), ((a as u16 + b as u16) % 256) as u8);
        prop_assert_eq!(m.register(0xF), (a as u16 + b as u16 > 255) as u8);
    }

    #[test]
    fn sub_flag_is_strictly_greater_before_subtracting(a in any::<u8>(), b in any::<u8>()) {
        let m = alu(0x8125, a, b);
        prop_assert_eq!(m.register(0x1), a.wrapping_sub(b));
        prop_assert_eq!(m.register(0xF), (a > b) as u8);
    }

    #[test]
    fn reversed_sub_flag_is_strictly_less(a in any::<u8>(), b in any::<u8>()) {
        let m = alu(0x8127, a, b);
        prop_assert_eq!(m.register(0x1), b.wrapping_sub(a));
        prop_assert_eq!(m.register(0xF), (a < b) as u8);
    }

    #[test]
    fn shifts_flag_the_bit_shifted_out(a in any::<u8>()) {
        let m = alu(0x8106, a, 0);
        prop_assert_eq!(m.register(0x1), a >> 1);
        prop_assert_eq!(m.register(0xF), a & 1);
        let m = alu(0x810E, a, 0);
        prop_assert_eq!(m.register(0x1), a << 1);
        prop_assert_eq!(m.register(0xF), a >> 7);
    }

    #[test]
    fn drawing_twice_restores_the_frame(
        x in 0usize..128,
        y in 0usize..64,
        sprite in proptest::collection::vec(any::<u8>(), 1..16),
        background in proptest::collection::vec((0usize..64, 0usize..32), 0..20),
    ) {
        let mut fb = Framebuffer::default();
        for (bx, by) in background {
            fb.draw_sprite(bx, by, &[0x80]);
        }
        let before = fb.clone();
        fb.draw_sprite(x, y, &sprite);
        let collided = fb.draw_sprite(x, y, &sprite);
        prop_assert_eq!(&fb, &before);
        // the second draw clears every bit the first one lit
        let lit_by_first = sprite.iter().enumerate().any(|(row, byte)| {
            (0..8).any(|col| (byte >> (7 - col)) & 1 == 1 && !before.pixel(x + col, y + row))
        });
        prop_assert_eq!(collided, lit_by_first);
    }

    #[test]
    fn timers_never_go_below_zero(start in any::<u8>(), ticks in 0usize..300) {
        let t = Timers::new();
        t.set_delay(start);
        t.set_sound(start);
        let mut tones = 0;
        for _ in 0..ticks {
            if t.tick() {
                tones += 1;
            }
        }
        let expected = (start as usize).saturating_sub(ticks) as u8;
        prop_assert_eq!(t.delay(), expected);
        prop_assert_eq!(t.sound(), expected);
        prop_assert_eq!(tones, ticks.min(start as usize));
    }
}
