//! Layer masks для world queries.
//!
//! - **Layer:** на каком слое находится объект
//! - **Mask:** какие слои учитывает запрос (overlap/line test)
//!
//! Маска `0` в конфиге сенсора = проверка отключена.

/// Layer 1: Actors (игрок, NPC - всё что можно увидеть/услышать)
pub const LAYER_ACTORS: u32 = 0b10;

/// Layer 2: Environment (стены, укрытия)
pub const LAYER_ENVIRONMENT: u32 = 0b100;

/// Layer 3: Props (двери, ящики - перекрывают обзор, но не звук по умолчанию)
pub const LAYER_PROPS: u32 = 0b1000;

/// Mask: кандидаты для vision/proximity
pub const MASK_TARGETS: u32 = LAYER_ACTORS;

/// Mask: occlusion для line-of-sight
pub const MASK_VISION_OCCLUSION: u32 = LAYER_ENVIRONMENT | LAYER_PROPS;

/// Mask: occlusion для звука (только капитальные стены)
pub const MASK_SOUND_OCCLUSION: u32 = LAYER_ENVIRONMENT;

/// Название слоя для debug логов
pub fn layer_name(layer_bits: u32) -> &'static str {
    match layer_bits {
        LAYER_ACTORS => "Actors",
        LAYER_ENVIRONMENT => "Environment",
        LAYER_PROPS => "Props",
        _ => "Unknown",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_masks_compose_layers() {
        assert_eq!(MASK_VISION_OCCLUSION & LAYER_ENVIRONMENT, LAYER_ENVIRONMENT);
        assert_eq!(MASK_SOUND_OCCLUSION & LAYER_PROPS, 0);
        assert_eq!(layer_name(LAYER_PROPS), "Props");
        assert_eq!(layer_name(0), "Unknown");
    }
}
