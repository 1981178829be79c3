//! Default registration names.
//!
//! [`derive_name`] turns a qualified type name into a lowercase identifier by
//! putting an underscore before every uppercase letter except the first
//! character. Uppercase runs are not collapsed: `HTTPServer` becomes
//! `h_t_t_p_server`. Existing registrations depend on that exact output.

/// Joins `segments` and converts the result to a lowercase, underscore-delimited
/// identifier.
///
/// ```rust
/// use gen_actor::derive_name;
///
/// assert_eq!(derive_name(["Kv", "Server"]), "kv_server");
/// assert_eq!(derive_name(["A", "B", "Server"]), "a_b_server");
/// assert_eq!(derive_name(["HTTPServer"]), "h_t_t_p_server");
/// ```
pub fn derive_name<I, T>(segments: I) -> String
where
    I: IntoIterator<Item = T>,
    T: AsRef<str>,
{
    let joined: String = segments
        .into_iter()
        .map(|segment| segment.as_ref().to_owned())
        .collect();

    let mut name = String::with_capacity(joined.len() + 4);
    for (position, ch) in joined.chars().enumerate() {
        if position > 0 && ch.is_uppercase() {
            name.push('_');
        }
        name.extend(ch.to_lowercase());
    }
    name
}

/// Like [`derive_name`], for a path written as `A.B.Server` or `a::b::Server`.
pub fn derive_name_from_path(path: &str) -> String {
    derive_name(path.split("::").flat_map(|part| part.split('.')))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn camel_case_gets_one_separator_per_capital() {
        assert_eq!(derive_name(["KvServer"]), "kv_server");
        assert_eq!(derive_name(["Kv", "Server"]), "kv_server");
    }

    #[test]
    fn uppercase_runs_are_split_per_letter() {
        assert_eq!(derive_name(["HTTPServer"]), "h_t_t_p_server");
    }

    #[test]
    fn dotted_and_rust_paths() {
        assert_eq!(derive_name_from_path("A.B.Server"), "a_b_server");
        assert_eq!(derive_name_from_path("kv_sample::KvServer"), "kv_sample_kv_server");
    }

    #[test]
    fn digits_and_empty_input() {
        assert_eq!(derive_name(["Worker2Pool"]), "worker2_pool");
        assert_eq!(derive_name(Vec::<String>::new()), "");
    }

    #[test]
    fn deterministic() {
        let first = derive_name_from_path("Cache.LRUStore");
        let second = derive_name_from_path("Cache.LRUStore");
        assert_eq!(first, second);
        assert_eq!(first, "cache_l_r_u_store");
    }
}
