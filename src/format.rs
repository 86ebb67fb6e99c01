use crate::{Config, Error, Number};
use crate::roll::RollRecord;


/// Renders an evaluated statement as the reply text.
///
/// The value is rounded to `config.round_decimals` places first. Integers are
/// left alone, so `7` stays `7` and `7.0` stays `7.0`. The whole reply never
/// exceeds `config.result_max_length` characters: roll lines that would
/// overflow it are left out, starting with the first one that does not fit.
///
/// # Errors
/// Returns [`Error::ResultTooLong`] if the result, with its statement prefix
/// when shown, exceeds `config.result_max_length` characters.
pub fn format_result(value: Number, statement: &str, rolls: &[RollRecord], config: &Config) -> Result<String, Error> {
    let limit = config.result_max_length;
    let value = round(value, config.round_decimals);
    let result = value.to_string();

    let mut reply = if config.show_statement && statement != result {
        format!("{statement} = {result}")
    } else {
        result
    };

    let mut length = reply.chars().count();
    if length > limit {
        return Err(Error::ResultTooLong { length, limit });
    }

    if config.show_rolls {
        for record in rolls {
            let line = record.to_string();
            let line_length = line.chars().count() + 1;
            if length + line_length > limit {
                break;
            }

            reply.push('\n');
            reply.push_str(&line);
            length += line_length;
        }
    }

    Ok(reply)
}

fn round(value: Number, decimals: i32) -> Number {
    match value {
        Number::Float(x) if decimals >= 0 => {
            let scale = 10f64.powi(decimals);
            let scaled = (x * scale).round() / scale;
            if scaled.is_finite() {
                Number::Float(scaled)
            } else {
                value
            }
        }
        _ => value,
    }
}


#[cfg(test)]
mod test {
    use super::*;
    use crate::roll::Sides;

    #[test]
    fn test_integer_unchanged() {
        let reply = format_result(Number::Int(7), "7", &[], &Config::default()).unwrap();
        assert_eq!(reply, "7");
    }

    #[test]
    fn test_float_rounding() {
        let config = Config::default();
        assert_eq!(format_result(Number::Float(2.0 / 3.0), "2/3", &[], &config).unwrap(), "0.67");
        assert_eq!(format_result(Number::Float(3.0), "6/2", &[], &config).unwrap(), "3.0");
        assert_eq!(format_result(Number::Float(-1.005e3), "x", &[], &config).unwrap(), "-1005.0");

        let config = Config { round_decimals: -1, ..Config::default() };
        assert_eq!(format_result(Number::Float(0.125), "1/8", &[], &config).unwrap(), "0.125");

        let config = Config { round_decimals: 0, ..Config::default() };
        assert_eq!(format_result(Number::Float(2.5), "5/2", &[], &config).unwrap(), "3.0");
    }

    #[test]
    fn test_statement_prefix() {
        let config = Config { show_statement: true, ..Config::default() };
        assert_eq!(format_result(Number::Int(7), "3+4", &[], &config).unwrap(), "3+4 = 7");
        assert_eq!(format_result(Number::Int(7), "7", &[], &config).unwrap(), "7");
    }

    #[test]
    fn test_roll_lines() {
        let rolls = vec![
            RollRecord { count: 2, sides: Sides::Die(6), values: vec![3, 4] },
            RollRecord { count: 1, sides: Sides::Range { low: -1, high: 1 }, values: vec![0] },
        ];

        let config = Config { show_rolls: true, ..Config::default() };
        assert_eq!(
            format_result(Number::Int(7), "3+4+0", &rolls, &config).unwrap(),
            "7\n2d6: 3 4\n1d{-1,1}: 0"
        );

        let reply = format_result(Number::Int(7), "3+4+0", &rolls, &Config::default()).unwrap();
        assert_eq!(reply, "7");
    }

    #[test]
    fn test_result_too_long() {
        let config = Config { result_max_length: 3, ..Config::default() };
        assert_eq!(
            format_result(Number::Int(1234), "1234", &[], &config),
            Err(Error::ResultTooLong { length: 4, limit: 3 })
        );

        let config = Config { result_max_length: 10, show_statement: true, ..Config::default() };
        assert_eq!(
            format_result(Number::Int(123), "100+20+3", &[], &config),
            Err(Error::ResultTooLong { length: 14, limit: 10 })
        );
        assert_eq!(format_result(Number::Int(123), "123", &[], &config).unwrap(), "123");
    }

    #[test]
    fn test_roll_lines_stay_within_limit() {
        let big = RollRecord { count: 19, sides: Sides::Die(999_999_999), values: vec![999_999_999; 19] };
        let rolls = vec![big.clone(), big.clone(), big.clone(), big];
        let config = Config { show_rolls: true, show_statement: true, ..Config::default() };

        let statement = "1+1+1+1";
        let reply = format_result(Number::Int(4), statement, &rolls, &config).unwrap();
        let lines: Vec<&str> = reply.lines().collect();

        assert!(reply.chars().count() <= config.result_max_length, "reply was {} long", reply.len());
        assert_eq!(lines[0], "1+1+1+1 = 4");
        assert_eq!(lines.len(), 3);
        assert!(lines[1].starts_with("19d999999999: 999999999 "));
    }
}
