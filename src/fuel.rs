use crate::error::ParseError;

/// Fuel needed to launch `mass`: divide by three, round down, subtract two.
///
/// Masses below 6 need negative fuel; callers summing whole modules use
/// [`fuel_for_module`], which never goes below zero.
pub fn fuel_for_mass(mass: i64) -> i64 {
    mass / 3 - 2
}

/// Fuel for a module including the fuel needed to carry its own fuel.
///
/// Each increment of fuel is itself treated as mass until the requirement
/// drops to zero or below.
pub fn fuel_for_module(mass: i64) -> i64 {
    std::iter::successors(Some(fuel_for_mass(mass)), |&fuel| Some(fuel_for_mass(fuel)))
        .take_while(|&fuel| fuel > 0)
        .sum()
}

/// Sum the fuel requirement over every module mass.
pub fn total_fuel(masses: &[i64], recursive: bool) -> i64 {
    if recursive {
        masses.iter().copied().map(fuel_for_module).sum()
    } else {
        masses.iter().copied().map(fuel_for_mass).sum()
    }
}

/// Parse one module mass per line. Blank lines are skipped; `position` in
/// the error is the zero-based line number.
pub fn parse_masses(text: &str) -> Result<Vec<i64>, ParseError> {
    text.lines()
        .enumerate()
        .map(|(position, line)| (position, line.trim()))
        .filter(|(_, line)| !line.is_empty())
        .map(|(position, line)| {
            line.parse::<i64>().map_err(|_| ParseError {
                position,
                cell: line.to_string(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fuel_for_mass() {
        assert_eq!(fuel_for_mass(12), 2);
        assert_eq!(fuel_for_mass(14), 2);
        assert_eq!(fuel_for_mass(1969), 654);
        assert_eq!(fuel_for_mass(100756), 33583);
    }

    #[test]
    fn test_fuel_for_tiny_mass_is_negative() {
        assert_eq!(fuel_for_mass(2), -2);
        assert_eq!(fuel_for_mass(6), 0);
    }

    #[test]
    fn test_fuel_for_module() {
        assert_eq!(fuel_for_module(14), 2);
        assert_eq!(fuel_for_module(1969), 966);
        assert_eq!(fuel_for_module(100756), 50346);
    }

    #[test]
    fn test_fuel_for_module_tiny_mass() {
        assert_eq!(fuel_for_module(0), 0);
        assert_eq!(fuel_for_module(8), 0);
        assert_eq!(fuel_for_module(9), 1);
    }

    #[test]
    fn test_total_fuel() {
        let masses = [12, 14, 1969, 100756];
        assert_eq!(total_fuel(&masses, false), 2 + 2 + 654 + 33583);
        assert_eq!(total_fuel(&masses, true), 2 + 2 + 966 + 50346);
        assert_eq!(total_fuel(&[], true), 0);
    }

    #[test]
    fn test_parse_masses() {
        assert_eq!(parse_masses("12\n14\n\n1969\n").unwrap(), vec![12, 14, 1969]);
        let err = parse_masses("12\nheavy\n").unwrap_err();
        assert_eq!(err.position, 1);
        assert_eq!(err.cell, "heavy");
    }
}
