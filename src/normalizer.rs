use crate::model::HardwareClass;

const GPU_VENDOR_TOKENS: [&str; 2] = ["NVIDIA", "AMD"];

/// Cleans a raw spec-table value before it is matched against a benchmark table.
///
/// GPU values are listed as `"Model/AlternateModel"` and carry vendor names the
/// benchmark sites leave out, so only the first alternative is kept and the
/// vendor tokens are dropped. CPU values are used as-is.
pub fn normalize(raw: &str, class: HardwareClass) -> String {
    match class {
        HardwareClass::Cpu => raw.to_string(),
        HardwareClass::Gpu => {
            let primary = raw.split('/').next().unwrap_or_default();
            let mut name = primary.to_string();
            for token in GPU_VENDOR_TOKENS {
                name = name.replace(token, "");
            }
            name.trim().to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gpu_drops_alternative_and_vendor() {
        assert_eq!(
            normalize("NVIDIA GeForce RTX 3060/Max-Q", HardwareClass::Gpu),
            "GeForce RTX 3060"
        );
        assert_eq!(normalize("AMD Radeon RX 6600M", HardwareClass::Gpu), "Radeon RX 6600M");
    }

    #[test]
    fn vendor_tokens_are_case_sensitive() {
        assert_eq!(normalize("nvidia GeForce MX250", HardwareClass::Gpu), "nvidia GeForce MX250");
    }

    #[test]
    fn cpu_is_used_as_is() {
        assert_eq!(
            normalize("Core i7-1165G7 / vPro", HardwareClass::Cpu),
            "Core i7-1165G7 / vPro"
        );
        assert_eq!(normalize(" AMD Ryzen 5 5500U ", HardwareClass::Cpu), " AMD Ryzen 5 5500U ");
    }

    #[test]
    fn empty_input_stays_empty() {
        assert_eq!(normalize("", HardwareClass::Gpu), "");
        assert_eq!(normalize("", HardwareClass::Cpu), "");
        assert_eq!(normalize("/", HardwareClass::Gpu), "");
    }

    #[test]
    fn gpu_normalization_is_idempotent() {
        for raw in ["GeForce GTX 1650", "NVIDIA GeForce GTX 1650/Max-Q", "  Radeon 680M  ", "AMD"] {
            let once = normalize(raw, HardwareClass::Gpu);
            assert_eq!(normalize(&once, HardwareClass::Gpu), once);
        }
    }
}
