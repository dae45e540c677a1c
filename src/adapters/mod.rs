// Adapters layer: concrete renderers the receiver can drive. The LED panel
// driver itself lives outside this crate and can consume `JsonRenderer` output.

pub mod render;
