//! Synthetic sensor model: initial readings, per-tick drift and the
//! coordinated three-channel alert.

use rubblerats_core::components::Sensors;
use rubblerats_core::config::ProbeParams;

use crate::random::RandomSource;

/// Draw a fresh set of readings from the configured ranges.
pub fn initial<R: RandomSource + ?Sized>(params: &ProbeParams, rng: &mut R) -> Sensors {
    Sensors {
        ultrasonic: draw(rng, params.ultrasonic_range),
        co2: draw(rng, params.co2_range),
        microphone: draw(rng, params.mic_range),
        temperature: draw(rng, params.temperature_range),
        thermal: draw(rng, params.thermal_range),
        lora_signal: draw(rng, params.lora_signal_range),
    }
}

fn draw<R: RandomSource + ?Sized>(rng: &mut R, (lo, hi): (f64, f64)) -> f64 {
    rng.uniform(lo, hi)
}

/// Symmetric noise on CO2 and microphone, plus rare independent spikes.
/// Ultrasonic is owned by avoidance; the other channels stay fixed.
pub fn drift<R: RandomSource + ?Sized>(sensors: &mut Sensors, params: &ProbeParams, rng: &mut R) {
    let co2_amp = params.co2_drift_amplitude;
    let mic_amp = params.mic_drift_amplitude;
    sensors.co2 += rng.uniform(-co2_amp, co2_amp);
    sensors.microphone += rng.uniform(-mic_amp, mic_amp);

    if rng.chance(params.spike_probability) {
        sensors.co2 += params.co2_spike;
    }
    if rng.chance(params.spike_probability) {
        sensors.microphone += params.mic_spike;
    }
}

/// All three channels must exceed their thresholds in the same tick.
pub fn coordinated_alert(sensors: &Sensors, params: &ProbeParams) -> bool {
    sensors.co2 > params.alert_co2_ppm
        && sensors.microphone > params.alert_mic_level
        && sensors.thermal > params.alert_thermal_c
}
