use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;

/// Textual form of a value substituted into a URL path segment.
pub trait PathValue {
    fn to_path_value(&self) -> String;
}

macro_rules! display_path_value {
    ($($ty:ty),* $(,)?) => {
        $(
            impl PathValue for $ty {
                fn to_path_value(&self) -> String {
                    self.to_string()
                }
            }
        )*
    };
}

display_path_value!(i32, i64, u32, u64, f32, f64, bool, str, String);

/// Bytes travel as unpadded URL-safe base64.
impl PathValue for [u8] {
    fn to_path_value(&self) -> String {
        URL_SAFE_NO_PAD.encode(self)
    }
}

impl PathValue for Vec<u8> {
    fn to_path_value(&self) -> String {
        self.as_slice().to_path_value()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn values_are_verbatim() {
        assert_eq!(42i64.to_path_value(), "42");
        assert_eq!("a b".to_path_value(), "a b");
        assert_eq!(true.to_path_value(), "true");
        assert_eq!(vec![0xfbu8, 0xff].to_path_value(), "-_8");
    }
}
