//! Name lists and template substitution for event messages

use crate::game::player::Player;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameFormat {
    Username,
    Nickname,
    /// Chat mention for real users; NPCs fall back to their username
    Mention,
}

impl NameFormat {
    pub fn from_nickname_option(use_nicknames: bool) -> Self {
        if use_nicknames {
            NameFormat::Nickname
        } else {
            NameFormat::Username
        }
    }
}

/// Join names as "`a`, `b` and `c`".
pub fn format_multi_names(players: &[&Player], format: NameFormat) -> String {
    let mut output = String::new();
    for (i, player) in players.iter().enumerate() {
        match format {
            NameFormat::Mention if !player.is_npc => {
                output.push_str(&format!("<@{}>", player.id));
            }
            NameFormat::Nickname => {
                output.push('`');
                output.push_str(player.display_name(true));
                output.push('`');
            }
            _ => {
                output.push('`');
                output.push_str(&player.name);
                output.push('`');
            }
        }
        if players.len() >= 2 && i == players.len() - 2 {
            output.push_str(" and ");
        } else if i + 1 != players.len() {
            output.push_str(", ");
        }
    }
    output
}

/// Replace every `[<tag>singular|plural]` selector with one of its forms.
///
/// A selector missing its `|` or closing `]` is left untouched.
pub fn select_plural(text: &str, tag: char, plural: bool) -> String {
    let opener = format!("[{}", tag);
    let mut output = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(start) = rest.find(&opener) {
        let body = &rest[start + opener.len()..];
        let Some(bar) = body.find('|') else {
            break;
        };
        let Some(close) = body[bar + 1..].find(']') else {
            break;
        };
        let singular = &body[..bar];
        let plural_form = &body[bar + 1..bar + 1 + close];
        output.push_str(&rest[..start]);
        output.push_str(if plural { plural_form } else { singular });
        rest = &body[bar + 1 + close + 1..];
    }
    output.push_str(rest);
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    fn players() -> Vec<Player> {
        vec![
            Player::new("1", "Alice").with_nickname("Al"),
            Player::new("2", "Bob"),
            Player::npc("npc-3", "Cato", ""),
        ]
    }

    #[test]
    fn test_name_lists() {
        let all = players();
        let refs: Vec<&Player> = all.iter().collect();
        assert_eq!(format_multi_names(&refs[..1], NameFormat::Username), "`Alice`");
        assert_eq!(format_multi_names(&refs[..2], NameFormat::Username), "`Alice` and `Bob`");
        assert_eq!(
            format_multi_names(&refs, NameFormat::Nickname),
            "`Al`, `Bob` and `Cato`"
        );
        assert_eq!(
            format_multi_names(&refs, NameFormat::Mention),
            "<@1>, <@2> and `Cato`"
        );
        assert_eq!(format_multi_names(&[], NameFormat::Username), "");
    }

    #[test]
    fn test_plural_selectors() {
        let text = "{victim} [Vis|are] hit by [Aan arrow|arrows]. [Vhim|them]";
        assert_eq!(select_plural(text, 'V', true), "{victim} are hit by [Aan arrow|arrows]. them");
        assert_eq!(select_plural(text, 'A', false), "{victim} [Vis|are] hit by an arrow. [Vhim|them]");
        assert_eq!(select_plural("[Vbroken", 'V', true), "[Vbroken");
    }
}
