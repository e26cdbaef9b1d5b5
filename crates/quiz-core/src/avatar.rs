//! Stable per-player avatars

/// Avatar palette; a player's avatar is picked by hashing their name
pub const AVATARS: [&str; 15] = [
    "👨‍💻", "👩‍💻", "🧑‍🎓", "👨‍🎓", "👩‍🎓", "🧑‍🚀", "👨‍🚀", "👩‍🚀", "🧑‍🎨", "👨‍🎨", "👩‍🎨", "🧙‍♂️", "🧙‍♀️",
    "🦸‍♂️", "🦸‍♀️",
];

/// 32-bit `hash * 31 + code` over the UTF-16 code units of `name`
pub fn name_hash(name: &str) -> i32 {
    name.encode_utf16()
        .fold(0i32, |hash, code| hash.wrapping_mul(31).wrapping_add(i32::from(code)))
}

/// Palette index for `name`, or `None` for an empty palette
pub fn avatar_index(name: &str, palette_len: usize) -> Option<usize> {
    if palette_len == 0 {
        return None;
    }
    Some(name_hash(name).unsigned_abs() as usize % palette_len)
}

/// Avatar from [`AVATARS`] for `name`
pub fn avatar_for(name: &str) -> &'static str {
    avatar_index(name, AVATARS.len())
        .map(|i| AVATARS[i])
        .unwrap_or(AVATARS[0])
}
