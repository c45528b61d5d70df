use std::time::{Duration, Instant};

use log::info;

use crate::{
    config::Config,
    emulator::{Cycle, Emulator},
    error::Result,
    host::{Audio, HostEvent, Input, Screen},
    timer::Pacer,
};

/// Drives the emulator: instruction cycles at `cpu_hz`, timer decrements at
/// `timer_hz`, each on its own fixed-step accumulator.
pub struct Runner {
    cpu: Pacer,
    timers: Pacer,
    halted: bool,
}

impl Runner {
    pub fn new(config: &Config) -> Self {
        Self {
            cpu: Pacer::new(config.cpu_hz),
            timers: Pacer::new(config.timer_hz),
            halted: false,
        }
    }

    pub fn is_halted(&self) -> bool {
        self.halted
    }

    /// One driver iteration covering `elapsed` wall time.
    pub fn iterate<H, A>(
        &mut self,
        emu: &mut Emulator,
        host: &mut H,
        audio: &mut A,
        elapsed: Duration,
    ) -> Result<()>
    where
        H: Screen + Input + ?Sized,
        A: Audio + ?Sized,
    {
        for event in host.poll_events()? {
            match event {
                HostEvent::Quit => self.halted = true,
                HostEvent::KeyDown(key) => emu.key_down(key)?,
                HostEvent::KeyUp(key) => emu.key_up(key)?,
            }
        }
        if self.halted {
            return Ok(());
        }

        let mut redraw = false;
        for _ in 0..self.cpu.advance(elapsed) {
            match emu.step()? {
                Cycle::Continue => {}
                Cycle::Redraw => redraw = true,
                Cycle::Blocked => break,
            }
        }

        for _ in 0..self.timers.advance(elapsed) {
            emu.tick_timers();
        }
        audio.set_tone(emu.sound_active())?;

        if redraw {
            host.present(emu.frame_buffer())?;
        }
        Ok(())
    }

    pub fn run<H, A>(&mut self, emu: &mut Emulator, host: &mut H, audio: &mut A) -> Result<()>
    where
        H: Screen + Input + ?Sized,
        A: Audio + ?Sized,
    {
        host.present(emu.frame_buffer())?;
        let mut last = Instant::now();
        while !self.halted {
            let now = Instant::now();
            self.iterate(emu, host, audio, now - last)?;
            last = now;
            spin_sleep::sleep(self.cpu.until_next());
        }
        info!("quit requested, stopping");
        audio.set_tone(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{display::FrameBuffer, emulator::State, sound::Mute};
    use std::collections::VecDeque;

    #[derive(Default)]
    struct FakeHost {
        events: VecDeque<Vec<HostEvent>>,
        frames: Vec<FrameBuffer>,
    }

    impl Screen for FakeHost {
        fn present(&mut self, fb: &FrameBuffer) -> Result<()> {
            self.frames.push(fb.clone());
            Ok(())
        }
    }

    impl Input for FakeHost {
        fn poll_events(&mut self) -> Result<Vec<HostEvent>> {
            Ok(self.events.pop_front().unwrap_or_default())
        }
    }

    fn setup(rom: &[u8]) -> (Runner, Emulator) {
        let config = Config {
            cpu_hz: 100,
            timer_hz: 50,
            ..Config::default()
        };
        let mut emu = Emulator::init(&config);
        emu.load_rom(rom).unwrap();
        (Runner::new(&config), emu)
    }

    #[test]
    fn cycles_follow_elapsed_time() {
        // V1 += 1 forever
        let (mut runner, mut emu) = setup(&[0x71, 0x01, 0x12, 0x00]);
        let mut host = FakeHost::default();
        let mut audio = Mute::default();

        runner
            .iterate(&mut emu, &mut host, &mut audio, Duration::from_millis(40))
            .unwrap();
        // four cycles: add, jump, add, jump
        assert_eq!(emu.regs.get(1), 2);
        assert_eq!(emu.regs.pc.0, 0x200);
    }

    #[test]
    fn timers_run_at_their_own_rate() {
        // V0 = 10, DT = V0, ST = V0, then spin
        let (mut runner, mut emu) = setup(&[0x60, 0x0A, 0xF0, 0x15, 0xF0, 0x18, 0x12, 0x06]);
        let mut host = FakeHost::default();
        let mut audio = Mute::default();

        runner
            .iterate(&mut emu, &mut host, &mut audio, Duration::from_millis(30))
            .unwrap();
        assert_eq!(emu.delay_timer.count, 10 - 1);
        assert!(audio.on);

        runner
            .iterate(&mut emu, &mut host, &mut audio, Duration::from_millis(200))
            .unwrap();
        assert_eq!(emu.delay_timer.count, 0);
        assert!(!audio.on);
    }

    #[test]
    fn redraws_after_draw_instructions() {
        // DRW V0, V0, 5 then spin
        let (mut runner, mut emu) = setup(&[0xD0, 0x05, 0x12, 0x02]);
        let mut host = FakeHost::default();
        let mut audio = Mute::default();

        runner
            .iterate(&mut emu, &mut host, &mut audio, Duration::from_millis(20))
            .unwrap();
        assert_eq!(host.frames.len(), 1);
        assert!(host.frames[0].get(0, 0));

        runner
            .iterate(&mut emu, &mut host, &mut audio, Duration::from_millis(20))
            .unwrap();
        assert_eq!(host.frames.len(), 1);
    }

    #[test]
    fn key_events_release_a_waiting_machine() {
        // LD V2, K then V3 = 1
        let (mut runner, mut emu) = setup(&[0xF2, 0x0A, 0x63, 0x01, 0x12, 0x04]);
        let mut host = FakeHost::default();
        let mut audio = Mute::default();

        runner
            .iterate(&mut emu, &mut host, &mut audio, Duration::from_millis(50))
            .unwrap();
        assert_eq!(emu.state(), State::WaitingForKey(2));
        assert_eq!(emu.regs.pc.0, 0x202);

        host.events.push_back(vec![HostEvent::KeyDown(0xC)]);
        runner
            .iterate(&mut emu, &mut host, &mut audio, Duration::from_millis(10))
            .unwrap();
        assert_eq!(emu.state(), State::Running);
        assert_eq!(emu.regs.get(2), 0xC);
        assert_eq!(emu.regs.get(3), 1);
    }

    #[test]
    fn quit_halts_even_while_waiting() {
        let (mut runner, mut emu) = setup(&[0xF0, 0x0A]);
        let mut host = FakeHost::default();
        let mut audio = Mute::default();
        host.events.push_back(vec![]);
        host.events.push_back(vec![HostEvent::Quit]);

        runner
            .iterate(&mut emu, &mut host, &mut audio, Duration::from_millis(10))
            .unwrap();
        assert!(!runner.is_halted());

        runner.run(&mut emu, &mut host, &mut audio).unwrap();
        assert!(runner.is_halted());
    }

    #[test]
    fn fatal_errors_stop_the_driver() {
        // RET with nothing on the stack
        let (mut runner, mut emu) = setup(&[0x00, 0xEE]);
        let mut host = FakeHost::default();
        let mut audio = Mute::default();
        assert!(runner
            .iterate(&mut emu, &mut host, &mut audio, Duration::from_millis(10))
            .is_err());
    }
}
