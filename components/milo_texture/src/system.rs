/// Console a milo asset was built for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Ps2,
    Xbox,
    X360,
    Ps3,
    Wii,
    Pc,
}

/// Target profile of a milo asset: scene version, console and byte order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SystemInfo {
    pub version: u32,
    pub platform: Platform,
    pub big_endian: bool,
}

impl SystemInfo {
    /// Xbox 360 Rock Band containers (milo version 25)
    pub const XBOX_360: SystemInfo = SystemInfo {
        version: 25,
        platform: Platform::X360,
        big_endian: true,
    };

    /// Xbox 360 stores block-compressed texels as big-endian 16-bit words
    pub fn swaps_block_words(&self) -> bool {
        self.platform == Platform::X360 && self.big_endian
    }
}

impl Default for SystemInfo {
    fn default() -> Self {
        Self::XBOX_360
    }
}
