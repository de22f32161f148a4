//! Sound triggers
//!
//! The simulation reports what happened as `GameEvent`s; `dispatch_events`
//! turns them into requests on a `SoundTrigger`. The browser build backs the
//! trait with decoded Web Audio buffers, everything else uses `NullAudio`.

use crate::sim::GameEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundKind {
    /// Player shot
    Fire,
    /// Engine rumble (loop)
    Thrust,
    /// Asteroid or saucer blown up
    Explosion,
    /// Player ship lost
    ShipExplosion,
    /// Saucer drone while it crosses the field (loop)
    SaucerHum,
    /// Saucer shot
    SaucerShot,
}

impl SoundKind {
    pub const ALL: [SoundKind; 6] = [
        SoundKind::Fire,
        SoundKind::Thrust,
        SoundKind::Explosion,
        SoundKind::ShipExplosion,
        SoundKind::SaucerHum,
        SoundKind::SaucerShot,
    ];

    /// Path of the sound file, relative to the page
    pub fn asset_path(&self) -> &'static str {
        match self {
            SoundKind::Fire => "sounds/fire.wav",
            SoundKind::Thrust => "sounds/thrust.wav",
            SoundKind::Explosion => "sounds/explosion.wav",
            SoundKind::ShipExplosion => "sounds/ship_explosion.wav",
            SoundKind::SaucerHum => "sounds/saucer.wav",
            SoundKind::SaucerShot => "sounds/saucer_shot.wav",
        }
    }

    /// Loops are started and stopped; everything else is a one-shot
    pub fn is_loop(&self) -> bool {
        matches!(self, SoundKind::Thrust | SoundKind::SaucerHum)
    }
}

/// Playback requests the game makes. Implementations must treat a kind
/// that never loaded as a no-op.
pub trait SoundTrigger {
    /// Fire-and-forget playback at `gain` (0.0 - 1.0, before master volume)
    fn play_one_shot(&mut self, kind: SoundKind, gain: f32);
    /// Start a loop with a short fade-in. No-op if it is already playing.
    fn start_loop(&mut self, kind: SoundKind);
    /// Fade a loop out and release it. No-op if it is not playing.
    fn stop_loop(&mut self, kind: SoundKind);
    /// Cut off any one-shot of this kind that is still sounding
    fn cancel(&mut self, kind: SoundKind);
}

/// Silent backend (headless runs, no AudioContext)
#[derive(Debug, Default, Clone, Copy)]
pub struct NullAudio;

impl SoundTrigger for NullAudio {
    fn play_one_shot(&mut self, _kind: SoundKind, _gain: f32) {}
    fn start_loop(&mut self, _kind: SoundKind) {}
    fn stop_loop(&mut self, _kind: SoundKind) {}
    fn cancel(&mut self, _kind: SoundKind) {}
}

/// Explosion loudness scales with the rock's size
pub fn explosion_gain(radius: f32, max_radius: f32) -> f32 {
    if max_radius <= 0.0 {
        return 0.5;
    }
    (0.3 + 0.6 * radius / max_radius).clamp(0.2, 1.0)
}

/// Map one tick's events onto sound requests
pub fn dispatch_events<S: SoundTrigger + ?Sized>(
    events: &[GameEvent],
    sound: &mut S,
    max_asteroid_radius: f32,
) {
    for event in events {
        match *event {
            GameEvent::PlayerFired => sound.play_one_shot(SoundKind::Fire, 0.4),
            GameEvent::SaucerFired => sound.play_one_shot(SoundKind::SaucerShot, 0.3),
            GameEvent::AsteroidDestroyed { radius, .. } => sound.play_one_shot(
                SoundKind::Explosion,
                explosion_gain(radius, max_asteroid_radius),
            ),
            GameEvent::SaucerDestroyed { .. } => {
                sound.cancel(SoundKind::SaucerShot);
                sound.stop_loop(SoundKind::SaucerHum);
                sound.play_one_shot(SoundKind::Explosion, 0.8);
            }
            GameEvent::ShipDestroyed { .. } => sound.play_one_shot(SoundKind::ShipExplosion, 0.9),
            GameEvent::EngineStarted => sound.start_loop(SoundKind::Thrust),
            GameEvent::EngineStopped => sound.stop_loop(SoundKind::Thrust),
            GameEvent::SaucerSpawned => sound.start_loop(SoundKind::SaucerHum),
            GameEvent::SaucerExited => sound.stop_loop(SoundKind::SaucerHum),
            GameEvent::GameStarted | GameEvent::GameOver => {
                sound.stop_loop(SoundKind::Thrust);
                sound.stop_loop(SoundKind::SaucerHum);
            }
            GameEvent::FieldRefilled => {}
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::AudioManager;

#[cfg(target_arch = "wasm32")]
mod web {
    use std::collections::HashMap;

    use wasm_bindgen::{JsCast, JsValue};
    use wasm_bindgen_futures::JsFuture;
    use web_sys::{AudioBuffer, AudioBufferSourceNode, AudioContext, GainNode, Response};

    use super::{SoundKind, SoundTrigger};
    use crate::consts::{LOOP_FADE_IN_SECS, LOOP_FADE_OUT_SECS};
    use crate::settings::Settings;

    /// A playing loop and its fade envelope
    struct LoopVoice {
        source: AudioBufferSourceNode,
        gain: GainNode,
    }

    /// Web Audio backend holding one decoded buffer per sound kind
    pub struct AudioManager {
        ctx: Option<AudioContext>,
        buffers: HashMap<SoundKind, AudioBuffer>,
        loops: HashMap<SoundKind, LoopVoice>,
        /// Most recent one-shot per kind, kept so it can be cut off
        last_shot: HashMap<SoundKind, AudioBufferSourceNode>,
        volume: f32,
    }

    impl AudioManager {
        /// Create the context and fetch/decode every sound. A sound that
        /// fails to load is left out and plays as silence.
        pub async fn load(settings: &Settings) -> Self {
            let ctx = AudioContext::new().ok();
            let mut buffers = HashMap::new();

            match &ctx {
                Some(ctx) => {
                    for kind in SoundKind::ALL {
                        match load_buffer(ctx, kind.asset_path()).await {
                            Ok(buffer) => {
                                buffers.insert(kind, buffer);
                            }
                            Err(err) => log::warn!(
                                "Sound {:?} unavailable ({}): {:?}",
                                kind,
                                kind.asset_path(),
                                err
                            ),
                        }
                    }
                    log::info!("Loaded {}/{} sounds", buffers.len(), SoundKind::ALL.len());
                }
                None => log::warn!("Failed to create AudioContext - audio disabled"),
            }

            Self {
                ctx,
                buffers,
                loops: HashMap::new(),
                last_shot: HashMap::new(),
                volume: settings.effective_volume(),
            }
        }

        /// Resume audio context (required after user gesture)
        pub fn resume(&self) {
            if let Some(ctx) = &self.ctx {
                if ctx.state() == web_sys::AudioContextState::Suspended {
                    let _ = ctx.resume();
                }
            }
        }

        /// Wire up a buffer source through its own gain node
        fn voice(&self, kind: SoundKind) -> Option<(AudioBufferSourceNode, GainNode)> {
            let ctx = self.ctx.as_ref()?;
            let buffer = self.buffers.get(&kind)?;

            let source = ctx.create_buffer_source().ok()?;
            source.set_buffer(Some(buffer));
            source.set_loop(kind.is_loop());
            let gain = ctx.create_gain().ok()?;
            source.connect_with_audio_node(&gain).ok()?;
            gain.connect_with_audio_node(&ctx.destination()).ok()?;

            Some((source, gain))
        }

        fn now(&self) -> f64 {
            self.ctx.as_ref().map(|ctx| ctx.current_time()).unwrap_or(0.0)
        }
    }

    impl SoundTrigger for AudioManager {
        fn play_one_shot(&mut self, kind: SoundKind, gain: f32) {
            if self.volume <= 0.0 || kind.is_loop() {
                return;
            }
            let Some((source, node)) = self.voice(kind) else {
                return;
            };
            node.gain().set_value(gain * self.volume);
            if source.start().is_ok() {
                self.last_shot.insert(kind, source);
            }
        }

        fn start_loop(&mut self, kind: SoundKind) {
            if !kind.is_loop() || self.loops.contains_key(&kind) || self.volume <= 0.0 {
                return;
            }
            let Some((source, gain)) = self.voice(kind) else {
                return;
            };

            let t = self.now();
            gain.gain().set_value_at_time(0.0, t).ok();
            gain.gain()
                .linear_ramp_to_value_at_time(self.volume, t + LOOP_FADE_IN_SECS)
                .ok();
            if source.start().is_ok() {
                self.loops.insert(kind, LoopVoice { source, gain });
            }
        }

        fn stop_loop(&mut self, kind: SoundKind) {
            let Some(voice) = self.loops.remove(&kind) else {
                return;
            };

            let t = self.now();
            let param = voice.gain.gain();
            param.cancel_scheduled_values(t).ok();
            param.set_value_at_time(param.value(), t).ok();
            param
                .linear_ramp_to_value_at_time(0.0, t + LOOP_FADE_OUT_SECS)
                .ok();
            voice.source.stop_with_when(t + LOOP_FADE_OUT_SECS).ok();
        }

        fn cancel(&mut self, kind: SoundKind) {
            if let Some(source) = self.last_shot.remove(&kind) {
                let _ = source.stop();
            }
        }
    }

    async fn load_buffer(ctx: &AudioContext, path: &str) -> Result<AudioBuffer, JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let response: Response = JsFuture::from(window.fetch_with_str(path))
            .await?
            .dyn_into()?;
        if !response.ok() {
            return Err(JsValue::from_str(&format!("HTTP {}", response.status())));
        }

        let data: js_sys::ArrayBuffer = JsFuture::from(response.array_buffer()?)
            .await?
            .dyn_into()?;
        let decoded = JsFuture::from(ctx.decode_audio_data(&data)?).await?;
        decoded.dyn_into()
    }
}
