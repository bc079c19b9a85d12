// THEORY (Perceptual Color):
// Color thresholds for the ball and goals are written in CIE L*a*b*, because
// L*a*b* separates lightness from chroma: a goal under a shadow keeps roughly
// the same a*/b* and only loses L*. Thresholds stay valid across a wider range
// of lighting than RGB boxes would.
//
// Conversion chain (single pixel, no neighbors):
// - sRGB bytes → linear light via a 256-entry `OnceLock` lookup table
// - linear RGB → CIE XYZ (D65 white point)
// - XYZ → L*a*b*, rounded to integers: L* in 0..=100, a*/b* in -128..=127
//
// The rounding and clamping mirror the integer L*a*b* space the robot's
// thresholds were tuned in.

pub mod lab_pixel {
    use std::sync::OnceLock;

    pub type Byte = u8;
    pub type LinearChannel = f32;
    pub type LabChannel = i8;

    // D65 reference white.
    const WHITE_X: f32 = 0.950_47;
    const WHITE_Y: f32 = 1.0;
    const WHITE_Z: f32 = 1.088_83;

    const DELTA: f32 = 6.0 / 29.0;

    static SRGB_TO_LINEAR_LUT: OnceLock<[LinearChannel; 256]> = OnceLock::new();

    /// A pixel expressed in integer CIE L*a*b*.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct LabPixel {
        pub l: LabChannel,
        pub a: LabChannel,
        pub b: LabChannel,
    }

    #[inline]
    fn srgb_to_linear(srgb_value: Byte) -> LinearChannel {
        let table = SRGB_TO_LINEAR_LUT.get_or_init(|| {
            let mut table = [0.0f32; 256];
            for (i, entry) in table.iter_mut().enumerate() {
                let srgb_normalized = i as f32 / 255.0;
                *entry = if srgb_normalized <= 0.04045 {
                    srgb_normalized / 12.92
                } else {
                    ((srgb_normalized + 0.055) / 1.055).powf(2.4)
                };
            }
            table
        });
        table[srgb_value as usize]
    }

    #[inline]
    fn lab_f(t: f32) -> f32 {
        if t > DELTA * DELTA * DELTA {
            t.cbrt()
        } else {
            t / (3.0 * DELTA * DELTA) + 4.0 / 29.0
        }
    }

    impl LabPixel {
        pub fn from_rgb(red: Byte, green: Byte, blue: Byte) -> Self {
            let r = srgb_to_linear(red);
            let g = srgb_to_linear(green);
            let b = srgb_to_linear(blue);

            let x = 0.412_456_4 * r + 0.357_576_1 * g + 0.180_437_5 * b;
            let y = 0.212_672_9 * r + 0.715_152_2 * g + 0.072_175_0 * b;
            let z = 0.019_333_9 * r + 0.119_192_0 * g + 0.950_304_1 * b;

            let fx = lab_f(x / WHITE_X);
            let fy = lab_f(y / WHITE_Y);
            let fz = lab_f(z / WHITE_Z);

            let l = (116.0 * fy - 16.0).round().clamp(0.0, 100.0);
            let a = (500.0 * (fx - fy)).round().clamp(-128.0, 127.0);
            let b = (200.0 * (fy - fz)).round().clamp(-128.0, 127.0);

            Self {
                l: l as LabChannel,
                a: a as LabChannel,
                b: b as LabChannel,
            }
        }
    }

    impl From<&image::Rgb<u8>> for LabPixel {
        fn from(pixel: &image::Rgb<u8>) -> Self {
            let [red, green, blue] = pixel.0;
            LabPixel::from_rgb(red, green, blue)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::lab_pixel::LabPixel;

    fn lab(l: i8, a: i8, b: i8) -> LabPixel {
        LabPixel { l, a, b }
    }

    #[test]
    fn achromatic_extremes() {
        assert_eq!(LabPixel::from_rgb(255, 255, 255), lab(100, 0, 0));
        assert_eq!(LabPixel::from_rgb(0, 0, 0), lab(0, 0, 0));
        assert_eq!(LabPixel::from_rgb(128, 128, 128), lab(54, 0, 0));
    }

    #[test]
    fn primaries() {
        assert_eq!(LabPixel::from_rgb(255, 0, 0), lab(53, 80, 67));
        assert_eq!(LabPixel::from_rgb(0, 255, 0), lab(88, -86, 83));
        assert_eq!(LabPixel::from_rgb(0, 0, 255), lab(32, 79, -108));
    }

    #[test]
    fn converts_image_pixels() {
        let pixel = image::Rgb([0u8, 180, 220]);
        assert_eq!(LabPixel::from(&pixel), lab(68, -24, -31));
    }
}
