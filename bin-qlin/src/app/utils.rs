use std::str::FromStr;
use qlin::Rational;
use crate::app::err::*;

pub fn measure<F, Res>(proc: F) -> (Res, std::time::Duration) 
where F: FnOnce() -> Res { 
    let start = std::time::Instant::now();
    let res = proc();
    let time = start.elapsed();
    (res, time)
}

pub fn guard_panic<F, R>(f: F) -> Result<R, Box<dyn std::error::Error>>
where F: FnOnce() -> Result<R, Box<dyn std::error::Error>> + std::panic::UnwindSafe {
    std::panic::catch_unwind(|| {
        f()
    }).unwrap_or_else(|e| {
        let info = match e.downcast::<String>() {
            Ok(v) => *v,
            Err(e) => match e.downcast::<&str>() {
                Ok(v) => v.to_string(),
                _ => "Unknown Source of Error".to_owned()
            }
        };
        err!(Panic(info))
    })
}

pub fn parse_rational(s: &str) -> Result<Rational, Box<dyn std::error::Error>> { 
    Ok(Rational::from_str(s)?)
}

pub fn parse_size(s: &str) -> Result<usize, Box<dyn std::error::Error>> { 
    match s.parse::<usize>() { 
        Ok(n) if n > 0 => Ok(n),
        _ => err!(InvalidSize(s.to_string()))
    }
}

/// Names start with a letter and continue with letters, digits or `_`.
pub fn is_valid_name(s: &str) -> bool { 
    let mut chars = s.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic()) && 
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests { 
    use super::*;

    #[test]
    fn parse() { 
        assert_eq!(parse_rational("-3/6").unwrap(), Rational::new(-1, 2));
        assert!(parse_rational("1/0").is_err());
        assert!(parse_rational("x").is_err());
        assert_eq!(parse_size("3").unwrap(), 3);
        let e = parse_size("0").unwrap_err();
        assert_eq!(e.downcast_ref::<Error>(), Some(&Error::InvalidSize("0".into())));
        assert!(parse_size("-1").is_err());
    }

    #[test]
    fn names() { 
        assert!(is_valid_name("A"));
        assert!(is_valid_name("v_1"));
        assert!(!is_valid_name("1v"));
        assert!(!is_valid_name(""));
        assert!(!is_valid_name("a-b"));
    }

    #[test]
    fn panic_guarded() { 
        let res: Result<(), _> = guard_panic(|| panic!("boom"));
        let e = res.unwrap_err();
        assert_eq!(e.to_string(), "panic: boom");
        assert_eq!(e.downcast_ref::<Error>(), Some(&Error::Panic("boom".into())));

        let res = guard_panic(|| Ok(1));
        assert_eq!(res.unwrap(), 1);
    }
}
