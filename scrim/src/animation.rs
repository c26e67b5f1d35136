//! Enter/leave animations.
//!
//! An [`AnimationBuilder`] turns an element id into an [`Animation`]
//! description. The description is handed to an [`AnimationRunner`], which
//! plays it and resolves when it is done. Runners are supplied by the host;
//! [`TimedRunner`] and [`FrameRunner`] step through the sampled frames on the
//! tokio clock and [`ImmediateRunner`] completes at once.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::Instant;

use crate::overlay::OverlayKind;
use crate::platform::Mode;

/// Easing function for animations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Easing {
    /// Linear interpolation (constant speed)
    #[default]
    Linear,
    /// Ease in (slow start, fast end)
    EaseIn,
    /// Ease out (fast start, slow end)
    EaseOut,
    /// Ease in-out (slow start and end)
    EaseInOut,
}

impl Easing {
    /// Apply easing function to a normalized time value (0.0 to 1.0).
    pub fn apply(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::EaseIn => t * t,
            Easing::EaseOut => t * (2.0 - t),
            Easing::EaseInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    -1.0 + (4.0 - 2.0 * t) * t
                }
            }
        }
    }
}

/// Part of the overlay an animation track targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationPart {
    Backdrop,
    Wrapper,
}

/// Property being animated.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AnimatedProperty {
    /// Opacity (0.0 to 1.0)
    Opacity { from: f32, to: f32 },
    /// Uniform scale factor
    Scale { from: f32, to: f32 },
}

impl AnimatedProperty {
    /// Interpolate the property at the given eased progress (0.0 to 1.0).
    pub fn interpolate(&self, progress: f32) -> f32 {
        let (from, to) = match *self {
            AnimatedProperty::Opacity { from, to } => (from, to),
            AnimatedProperty::Scale { from, to } => (from, to),
        };
        from + (to - from) * progress
    }
}

/// One animated property on one part.
#[derive(Debug, Clone, PartialEq)]
pub struct Track {
    pub part: AnimationPart,
    pub property: AnimatedProperty,
}

/// Description of an animation to play on an overlay element.
#[derive(Debug, Clone, PartialEq)]
pub struct Animation {
    /// Element id the animation runs on.
    pub element: String,
    pub duration: Duration,
    pub easing: Easing,
    pub tracks: Vec<Track>,
}

impl Animation {
    /// Create an empty animation on an element.
    pub fn new(element: impl Into<String>, duration: Duration) -> Self {
        Self {
            element: element.into(),
            duration,
            easing: Easing::default(),
            tracks: Vec::new(),
        }
    }

    /// Set the easing function.
    pub fn easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    /// Add a track.
    pub fn track(mut self, part: AnimationPart, property: AnimatedProperty) -> Self {
        self.tracks.push(Track { part, property });
        self
    }

    /// Force the duration (used to disable animation).
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Eased progress after `elapsed`.
    pub fn progress(&self, elapsed: Duration) -> f32 {
        if self.duration.is_zero() {
            return 1.0;
        }
        let t = elapsed.as_secs_f32() / self.duration.as_secs_f32();
        self.easing.apply(t)
    }

    /// Value of every track after `elapsed`.
    pub fn sample(&self, elapsed: Duration) -> Vec<(AnimationPart, f32)> {
        let progress = self.progress(elapsed);
        self.tracks
            .iter()
            .map(|track| (track.part, track.property.interpolate(progress)))
            .collect()
    }
}

/// Builds an [`Animation`] for an element id.
#[derive(Clone)]
pub struct AnimationBuilder(Arc<dyn Fn(&str) -> Animation + Send + Sync>);

impl AnimationBuilder {
    /// Wrap a builder function.
    pub fn new(f: impl Fn(&str) -> Animation + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    /// Build the animation for an element.
    pub fn build(&self, element: &str) -> Animation {
        (self.0)(element)
    }
}

impl fmt::Debug for AnimationBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AnimationBuilder(..)")
    }
}

/// Plays animations.
#[async_trait]
pub trait AnimationRunner: Send + Sync {
    /// Play the animation and resolve when it completes.
    async fn run(&self, animation: Animation, mode: Mode);
}

/// Time between two sampled frames.
pub const FRAME_INTERVAL: Duration = Duration::from_millis(16);

/// Receives the sampled track values of a running animation.
pub trait FrameSink: Send + Sync {
    /// Apply one frame to `element`.
    fn apply(&self, element: &str, frame: &[(AnimationPart, f32)]);
}

/// Step through `animation` one frame at a time until its duration is
/// reached. The last frame is always sampled at the full duration.
async fn play<F>(animation: &Animation, mut on_frame: F)
where
    F: FnMut(&[(AnimationPart, f32)]) + Send,
{
    let start = Instant::now();
    loop {
        let elapsed = start.elapsed().min(animation.duration);
        on_frame(&animation.sample(elapsed));
        if elapsed >= animation.duration {
            break;
        }
        tokio::time::sleep((animation.duration - elapsed).min(FRAME_INTERVAL)).await;
    }
}

/// Runner that steps through the animation on the tokio clock and traces
/// each sampled frame.
#[derive(Debug, Clone, Copy, Default)]
pub struct TimedRunner;

#[async_trait]
impl AnimationRunner for TimedRunner {
    async fn run(&self, animation: Animation, mode: Mode) {
        log::trace!(
            "Running {} animation on {} for {:?}",
            mode,
            animation.element,
            animation.duration
        );
        play(&animation, |frame| {
            log::trace!("{} frame: {:?}", animation.element, frame);
        })
        .await;
    }
}

/// Runner that steps through the animation and hands every frame to a
/// [`FrameSink`].
#[derive(Debug, Clone, Default)]
pub struct FrameRunner<S> {
    sink: S,
}

impl<S: FrameSink> FrameRunner<S> {
    pub fn new(sink: S) -> Self {
        Self { sink }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }
}

#[async_trait]
impl<S: FrameSink> AnimationRunner for FrameRunner<S> {
    async fn run(&self, animation: Animation, _mode: Mode) {
        play(&animation, |frame| self.sink.apply(&animation.element, frame)).await;
    }
}

/// Runner that completes immediately.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImmediateRunner;

#[async_trait]
impl AnimationRunner for ImmediateRunner {
    async fn run(&self, _animation: Animation, _mode: Mode) {}
}

/// Built-in enter/leave animations per overlay kind and mode.
pub mod presets {
    use super::*;

    const BACKDROP_OPACITY_IOS: f32 = 0.3;
    const BACKDROP_OPACITY_MD: f32 = 0.32;

    fn backdrop_opacity(mode: Mode) -> f32 {
        match mode {
            Mode::Ios => BACKDROP_OPACITY_IOS,
            Mode::Md => BACKDROP_OPACITY_MD,
        }
    }

    /// Enter animation for an overlay kind.
    pub fn enter(kind: OverlayKind, mode: Mode) -> AnimationBuilder {
        let backdrop = backdrop_opacity(mode);
        let (scale_from, millis) = match (kind, mode) {
            (OverlayKind::Alert, Mode::Md) => (0.9, 150),
            _ => (1.1, 200),
        };
        AnimationBuilder::new(move |element| {
            Animation::new(element, Duration::from_millis(millis))
                .easing(Easing::EaseInOut)
                .track(
                    AnimationPart::Backdrop,
                    AnimatedProperty::Opacity { from: 0.01, to: backdrop },
                )
                .track(
                    AnimationPart::Wrapper,
                    AnimatedProperty::Opacity { from: 0.01, to: 1.0 },
                )
                .track(
                    AnimationPart::Wrapper,
                    AnimatedProperty::Scale { from: scale_from, to: 1.0 },
                )
        })
    }

    /// Leave animation for an overlay kind.
    pub fn leave(kind: OverlayKind, mode: Mode) -> AnimationBuilder {
        let backdrop = backdrop_opacity(mode);
        let (scale, millis) = match (kind, mode) {
            (OverlayKind::Alert, Mode::Md) => (None, 150),
            _ => (Some(0.9), 200),
        };
        AnimationBuilder::new(move |element| {
            let animation = Animation::new(element, Duration::from_millis(millis))
                .easing(Easing::EaseInOut)
                .track(
                    AnimationPart::Backdrop,
                    AnimatedProperty::Opacity { from: backdrop, to: 0.0 },
                )
                .track(
                    AnimationPart::Wrapper,
                    AnimatedProperty::Opacity { from: 0.99, to: 0.0 },
                );
            match scale {
                Some(to) => animation.track(
                    AnimationPart::Wrapper,
                    AnimatedProperty::Scale { from: 1.0, to },
                ),
                None => animation,
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    #[derive(Default)]
    struct Recorder(Mutex<Vec<(String, Vec<(AnimationPart, f32)>)>>);

    impl FrameSink for Recorder {
        fn apply(&self, element: &str, frame: &[(AnimationPart, f32)]) {
            self.0.lock().unwrap().push((element.to_string(), frame.to_vec()));
        }
    }

    #[test]
    fn easing_is_clamped() {
        assert_eq!(Easing::EaseIn.apply(2.0), 1.0);
        assert_eq!(Easing::EaseOut.apply(-1.0), 0.0);
        assert_eq!(Easing::EaseInOut.apply(0.5), 0.5);
    }

    #[test]
    fn zero_duration_is_complete() {
        let animation = presets::enter(OverlayKind::Loading, Mode::Ios)
            .build("loading-1")
            .with_duration(Duration::ZERO);
        assert_eq!(animation.progress(Duration::ZERO), 1.0);
    }

    #[test]
    fn sample_reaches_targets() {
        let animation = presets::leave(OverlayKind::Loading, Mode::Md).build("loading-1");
        let end = animation.sample(animation.duration);
        assert!(end.iter().any(|(part, v)| *part == AnimationPart::Wrapper && *v == 0.0));
    }

    #[tokio::test(start_paused = true)]
    async fn frame_runner_plays_from_start_to_end() {
        let runner = FrameRunner::new(Recorder::default());
        let animation = presets::enter(OverlayKind::Loading, Mode::Ios).build("loading-1");
        let duration = animation.duration;

        let start = Instant::now();
        runner.run(animation, Mode::Ios).await;
        assert_eq!(start.elapsed(), duration);

        let frames = runner.sink().0.lock().unwrap();
        assert!(frames.len() as u128 > duration.as_millis() / FRAME_INTERVAL.as_millis());
        assert!(frames.iter().all(|(element, _)| element == "loading-1"));

        let (_, first) = &frames[0];
        assert_eq!(first[1], (AnimationPart::Wrapper, 0.01));
        let (_, last) = &frames[frames.len() - 1];
        let targets = [0.3, 1.0, 1.0];
        for ((_, value), target) in last.iter().zip(targets) {
            assert!((value - target).abs() < 1e-6, "{} != {}", value, target);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn zero_duration_plays_single_end_frame() {
        let runner = FrameRunner::new(Recorder::default());
        let animation = presets::leave(OverlayKind::Alert, Mode::Md)
            .build("alert-1")
            .with_duration(Duration::ZERO);
        runner.run(animation, Mode::Md).await;

        let frames = runner.sink().0.lock().unwrap();
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].1[1], (AnimationPart::Wrapper, 0.0));
    }
}
