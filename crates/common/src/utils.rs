use super::error_handling::*;
use std::str;

pub fn bytes_to_string<B>(bytes: B) -> MyResult<String> 
    where B: AsRef<[u8]>
{
    str::from_utf8(bytes.as_ref()).map(|s| s.to_string()).my_result()
}
pub trait BytesToStringExt: Sized+AsRef<[u8]> {
    fn to_str(self) -> MyResult<String> {
        bytes_to_string(self)
    }
}
impl <B: Sized+AsRef<[u8]>> BytesToStringExt for B {}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn utf8_roundtrip() {
        assert_eq!("João".as_bytes().to_str().unwrap(), "João");
    }

    #[test]
    fn invalid_utf8_errs() {
        assert!(bytes_to_string([0xffu8, 0xfe]).is_err());
    }
}
