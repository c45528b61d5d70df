/// Draws the sixteen font glyphs in two rows, waits for a key, starts over.
#[rustfmt::skip]
pub const SAMPLE: [u8; 32] = [
    0x00, 0xE0, // 200 CLS
    0x60, 0x00, // 202 LD V0, 0     glyph
    0x61, 0x00, // 204 LD V1, 0     x
    0x62, 0x00, // 206 LD V2, 0     y
    0xF0, 0x29, // 208 LD F, V0
    0xD1, 0x25, // 20A DRW V1, V2, 5
    0x70, 0x01, // 20C ADD V0, 1
    0x71, 0x08, // 20E ADD V1, 8
    0x31, 0x40, // 210 SE V1, 64
    0x12, 0x08, // 212 JP 208
    0x61, 0x00, // 214 LD V1, 0
    0x72, 0x06, // 216 ADD V2, 6
    0x30, 0x10, // 218 SE V0, 16
    0x12, 0x08, // 21A JP 208
    0xF3, 0x0A, // 21C LD V3, K
    0x12, 0x00, // 21E JP 200
];
