use std::sync::Arc;

use chip8::{Chip8Interpreter, Config, InputState, Instruction, StepOutcome};

fn machine(program: &[u8]) -> Chip8Interpreter {
    let config = Config {
        seed: Some(0x5eed),
        ..Config::default()
    };
    let mut m = Chip8Interpreter::new(Arc::new(InputState::new()), &config);
    m.load_program_bytes(program).unwrap();
    m
}

fn run(m: &mut Chip8Interpreter, steps: usize) {
    for _ in 0..steps {
        m.step().unwrap();
    }
}

#[test]
fn clear_index_load_draw() {
    let mut m = machine(&[0x00, 0xE0, 0xA0, 0x00, 0x60, 0x05, 0xD0, 0x05]);
    run(&mut m, 3);
    assert_eq!(m.index_register(), 0x000);
    assert_eq!(m.register(0), 5);
    assert_eq!(
        m.step().unwrap(),
        StepOutcome::Executed(Instruction::Draw(0, 0, 5))
    );
    assert_eq!(m.register(0xF), 0);

    // glyph "0" at (V0, V0)
    let fb = m.frame_reader().snapshot();
    let drawn: Vec<u8> = (0..5)
        .map(|row| (0..8).fold(0u8, |acc, col| acc << 1 | fb.pixel(5 + col, 5 + row) as u8))
        .collect();
    assert_eq!(drawn, [0xF0, 0x90, 0x90, 0x90, 0xF0]);
    assert_eq!(fb.lit().count(), 4 + 2 + 2 + 2 + 4);
}

#[test]
fn add_immediate_ten_times() {
    let mut program = Vec::new();
    for _ in 0..10 {
        program.extend_from_slice(&[0x70, 0x01]);
    }
    let mut m = machine(&program);
    m.set_register(0, 10);
    m.set_register(0xF, 0x42);
    run(&mut m, 10);
    assert_eq!(m.register(0), 20);
    assert_eq!(m.register(0xF), 0x42);
}

#[test]
fn call_then_return() {
    let mut m = machine(&[0x22, 0x00]);
    let depth = m.stack_pointer();
    run(&mut m, 1);
    assert_eq!(m.program_counter(), 0x200);
    assert_eq!(m.stack(), &[0x202]);

    m.poke(0x200, &[0x00, 0xEE]);
    run(&mut m, 1);
    assert_eq!(m.program_counter(), 0x202);
    assert_eq!(m.stack_pointer(), depth);
}

#[test]
fn bcd_of_glyph_digits_draws_number() {
    // V0 = 137; I = 0x300; BCD; load V0..V2; draw the hundreds digit
    let mut m = machine(&[
        0x60, 0x89, // LD V0, 137
        0xA3, 0x00, // LD I, 0x300
        0xF0, 0x33, // LD B, V0
        0xF2, 0x65, // LD V2, [I]
        0xF0, 0x29, // LD F, V0
        0x63, 0x00, // LD V3, 0
        0xD3, 0x35, // DRW V3, V3, 5
    ]);
    run(&mut m, 4);
    assert_eq!(&m.registers()[..3], &[1, 3, 7]);
    run(&mut m, 3);
    assert_eq!(m.index_register(), 5);
    let fb = m.frame_reader().snapshot();
    // top row of "1" is 0x20
    assert!(fb.pixel(2, 0));
    assert!(!fb.pixel(0, 0));
}

#[test]
fn countdown_loop_with_delay_timer() {
    // set DT = 3, then spin until DT reads 0
    let mut m = machine(&[
        0x60, 0x03, // LD V0, 3
        0xF0, 0x15, // LD DT, V0
        0xF1, 0x07, // LD V1, DT
        0x31, 0x00, // SE V1, 0
        0x12, 0x04, // JP 0x204
        0x12, 0x0A, // JP 0x20A (done)
    ]);
    let timers = m.timer_handle();
    let mut ticks = 0;
    for _ in 0..100 {
        m.step().unwrap();
        if m.program_counter() == 0x20A {
            break;
        }
        if m.program_counter() == 0x204 {
            timers.tick();
            ticks += 1;
        }
    }
    assert_eq!(m.program_counter(), 0x20A);
    assert_eq!(timers.delay(), 0);
    assert!(ticks >= 3);
}
