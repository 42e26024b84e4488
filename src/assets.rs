//! Asset manifest and session-scoped asset handles
//!
//! Everything is acquired once in `Assets::load` and released once in
//! `Assets::dispose`, which consumes the handles.

use std::fmt;

use crate::platform::{Host, MusicHandle, SoundHandle, TextureHandle};

/// Bucket sprite
pub const BUCKET_TEXTURE: &str = "bucket.png";
/// Raindrop sprite
pub const DROP_TEXTURE: &str = "drop.png";
/// Short collection cue
pub const DROP_SOUND: &str = "waterDrop.wav";
/// Looping ambient rain
pub const RAIN_MUSIC: &str = "underTreeRain.mp3";

/// What sort of asset a name refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetKind {
    Texture,
    Sound,
    Music,
}

impl AssetKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssetKind::Texture => "texture",
            AssetKind::Sound => "sound",
            AssetKind::Music => "music",
        }
    }
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Every asset the game needs, by kind
pub const MANIFEST: &[(AssetKind, &str)] = &[
    (AssetKind::Texture, DROP_TEXTURE),
    (AssetKind::Texture, BUCKET_TEXTURE),
    (AssetKind::Sound, DROP_SOUND),
    (AssetKind::Music, RAIN_MUSIC),
];

/// Startup asset failure. Always fatal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetError {
    /// The host has no asset by that name
    Missing { kind: AssetKind, name: String },
}

impl AssetError {
    pub fn missing(kind: AssetKind, name: &str) -> Self {
        AssetError::Missing {
            kind,
            name: name.to_string(),
        }
    }

    /// Name of the offending asset
    pub fn name(&self) -> &str {
        match self {
            AssetError::Missing { name, .. } => name,
        }
    }
}

impl fmt::Display for AssetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetError::Missing { kind, name } => write!(f, "missing {kind} asset '{name}'"),
        }
    }
}

impl std::error::Error for AssetError {}

/// Loaded handles for the session
#[derive(Debug)]
pub struct Assets {
    pub drop: TextureHandle,
    pub bucket: TextureHandle,
    pub drop_sound: SoundHandle,
    pub rain_music: MusicHandle,
}

impl Assets {
    /// Load the whole manifest. On failure, anything already loaded is
    /// released before the error is returned.
    pub fn load(host: &mut impl Host) -> Result<Self, AssetError> {
        let drop = host.load_texture(DROP_TEXTURE)?;

        let bucket = match host.load_texture(BUCKET_TEXTURE) {
            Ok(h) => h,
            Err(e) => {
                host.dispose_texture(drop);
                return Err(e);
            }
        };

        let drop_sound = match host.load_sound(DROP_SOUND) {
            Ok(h) => h,
            Err(e) => {
                host.dispose_texture(bucket);
                host.dispose_texture(drop);
                return Err(e);
            }
        };

        let rain_music = match host.load_music(RAIN_MUSIC) {
            Ok(h) => h,
            Err(e) => {
                host.dispose_sound(drop_sound);
                host.dispose_texture(bucket);
                host.dispose_texture(drop);
                return Err(e);
            }
        };

        log::info!("Loaded {} assets", MANIFEST.len());
        Ok(Self {
            drop,
            bucket,
            drop_sound,
            rain_music,
        })
    }

    /// Release every handle
    pub fn dispose(self, host: &mut impl Host) {
        host.stop_music(self.rain_music);
        host.dispose_music(self.rain_music);
        host.dispose_sound(self.drop_sound);
        host.dispose_texture(self.bucket);
        host.dispose_texture(self.drop);
        log::info!("Assets disposed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::HeadlessHost;

    #[test]
    fn test_load_full_manifest() {
        let mut host = HeadlessHost::new();
        let assets = Assets::load(&mut host).unwrap();
        assert_eq!(host.live_assets(), 4);
        assets.dispose(&mut host);
        assert_eq!(host.live_assets(), 0);
    }

    #[test]
    fn test_missing_asset_names_the_file() {
        let mut host = HeadlessHost::new().without_asset(DROP_SOUND);
        let err = Assets::load(&mut host).unwrap_err();
        assert_eq!(err, AssetError::missing(AssetKind::Sound, DROP_SOUND));
        assert_eq!(err.to_string(), "missing sound asset 'waterDrop.wav'");
        // Textures loaded before the failure were released
        assert_eq!(host.live_assets(), 0);
    }
}
