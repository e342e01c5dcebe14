use std::fmt;
use std::str::FromStr;

use crate::error::SqlGatewayError;

/// Whether a statement only reads or also changes rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementKind {
    Read,
    Write,
}

/// How a field's caller value is turned into a bound value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Bound as an integer; text must parse as `i64`.
    Int,
    /// Bound as text.
    Text,
    /// Bound as a `LIKE` pattern matching the value anywhere.
    Substring,
    /// Selects a column from a fixed allow-list. Never bound.
    Identifier,
}

/// One caller field accepted by an operation. The field name doubles as the placeholder
/// name in the operation's template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
}

/// Every statement the gateway can run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    StudentList,
    StudentSearch,
    StudentInsert,
    StudentUpdate,
    StudentDelete,
    BoardList,
    BoardSearch,
    BoardView,
    BoardHit,
    BoardInsert,
    BoardUpdate,
    BoardDelete,
    UserList,
    UserLogin,
    UserJoin,
    UserUpdate,
    UserDelete,
}

impl Operation {
    pub const ALL: [Operation; 17] = [
        Operation::StudentList,
        Operation::StudentSearch,
        Operation::StudentInsert,
        Operation::StudentUpdate,
        Operation::StudentDelete,
        Operation::BoardList,
        Operation::BoardSearch,
        Operation::BoardView,
        Operation::BoardHit,
        Operation::BoardInsert,
        Operation::BoardUpdate,
        Operation::BoardDelete,
        Operation::UserList,
        Operation::UserLogin,
        Operation::UserJoin,
        Operation::UserUpdate,
        Operation::UserDelete,
    ];

    /// Dotted name used in logs and by [`StatementBuilder::build`](super::StatementBuilder::build).
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Operation::StudentList => "student.list",
            Operation::StudentSearch => "student.search",
            Operation::StudentInsert => "student.insert",
            Operation::StudentUpdate => "student.update",
            Operation::StudentDelete => "student.delete",
            Operation::BoardList => "board.list",
            Operation::BoardSearch => "board.search",
            Operation::BoardView => "board.view",
            Operation::BoardHit => "board.hit",
            Operation::BoardInsert => "board.insert",
            Operation::BoardUpdate => "board.update",
            Operation::BoardDelete => "board.delete",
            Operation::UserList => "user.list",
            Operation::UserLogin => "user.login",
            Operation::UserJoin => "user.join",
            Operation::UserUpdate => "user.update",
            Operation::UserDelete => "user.delete",
        }
    }

    #[must_use]
    pub fn kind(self) -> StatementKind {
        match self {
            Operation::StudentList
            | Operation::StudentSearch
            | Operation::BoardList
            | Operation::BoardSearch
            | Operation::BoardView
            | Operation::UserList
            | Operation::UserLogin => StatementKind::Read,
            Operation::StudentInsert
            | Operation::StudentUpdate
            | Operation::StudentDelete
            | Operation::BoardHit
            | Operation::BoardInsert
            | Operation::BoardUpdate
            | Operation::BoardDelete
            | Operation::UserJoin
            | Operation::UserUpdate
            | Operation::UserDelete => StatementKind::Write,
        }
    }

    #[must_use]
    pub fn is_write(self) -> bool {
        self.kind() == StatementKind::Write
    }

    /// Fields the operation reads from the caller. All of them are required.
    #[must_use]
    pub fn fields(self) -> &'static [FieldSpec] {
        use FieldKind::{Identifier, Int, Substring, Text};
        match self {
            Operation::StudentList | Operation::BoardList | Operation::UserList => &[],
            Operation::StudentSearch | Operation::StudentDelete => &[FieldSpec {
                name: "stuNo",
                kind: Int,
            }],
            Operation::StudentInsert | Operation::StudentUpdate => &[
                FieldSpec { name: "stuNo", kind: Int },
                FieldSpec { name: "name", kind: Text },
                FieldSpec { name: "dept", kind: Text },
            ],
            Operation::BoardSearch => &[
                FieldSpec { name: "option", kind: Identifier },
                FieldSpec { name: "keyWord", kind: Substring },
            ],
            Operation::BoardView | Operation::BoardHit | Operation::BoardDelete => {
                &[FieldSpec { name: "boardNo", kind: Int }]
            }
            Operation::BoardInsert => &[
                FieldSpec { name: "title", kind: Text },
                FieldSpec { name: "userId", kind: Text },
                FieldSpec { name: "contents", kind: Text },
                FieldSpec { name: "kind", kind: Int },
            ],
            Operation::BoardUpdate => &[
                FieldSpec { name: "boardNo", kind: Int },
                FieldSpec { name: "title", kind: Text },
                FieldSpec { name: "contents", kind: Text },
                FieldSpec { name: "kind", kind: Int },
            ],
            Operation::UserLogin | Operation::UserJoin | Operation::UserUpdate => {
                &[
                    FieldSpec { name: "userId", kind: Text },
                    FieldSpec { name: "pwd", kind: Text },
                ]
            }
            Operation::UserDelete => &[FieldSpec { name: "userId", kind: Text }],
        }
    }

    /// The fixed SQL template. `board.search` has one template per searchable column; see
    /// [`SearchColumn::template`].
    #[must_use]
    pub(crate) fn template(self) -> Option<&'static str> {
        let sql = match self {
            Operation::StudentList => {
                r#"SELECT STU_NO AS "STU_NO", STU_NAME AS "STU_NAME", STU_DEPT AS "STU_DEPT" FROM STUDENT ORDER BY STU_NO"#
            }
            Operation::StudentSearch => {
                r#"SELECT STU_NO AS "STU_NO", STU_NAME AS "STU_NAME", STU_DEPT AS "STU_DEPT" FROM STUDENT WHERE STU_NO = :stuNo"#
            }
            Operation::StudentInsert => {
                "INSERT INTO STUDENT (STU_NO, STU_NAME, STU_DEPT) VALUES (:stuNo, :name, :dept)"
            }
            Operation::StudentUpdate => {
                "UPDATE STUDENT SET STU_NAME = :name, STU_DEPT = :dept WHERE STU_NO = :stuNo"
            }
            Operation::StudentDelete => "DELETE FROM STUDENT WHERE STU_NO = :stuNo",
            Operation::BoardList => {
                r#"SELECT BOARDNO AS "BOARDNO", TITLE AS "TITLE", CONTENTS AS "CONTENTS", USERID AS "USERID", KIND AS "KIND", CNT AS "CNT", CDATETIME AS "CDATETIME", UDATETIME AS "UDATETIME" FROM TBL_BOARD ORDER BY BOARDNO DESC"#
            }
            Operation::BoardSearch => return None,
            Operation::BoardView => {
                r#"SELECT BOARDNO AS "BOARDNO", TITLE AS "TITLE", CONTENTS AS "CONTENTS", USERID AS "USERID", KIND AS "KIND", CNT AS "CNT", CDATETIME AS "CDATETIME", UDATETIME AS "UDATETIME" FROM TBL_BOARD WHERE BOARDNO = :boardNo"#
            }
            Operation::BoardHit => "UPDATE TBL_BOARD SET CNT = CNT + 1 WHERE BOARDNO = :boardNo",
            Operation::BoardInsert => {
                "INSERT INTO TBL_BOARD (TITLE, CONTENTS, USERID, KIND, CNT, CDATETIME, UDATETIME) \
                 VALUES (:title, :contents, :userId, :kind, 0, CURRENT_TIMESTAMP, CURRENT_TIMESTAMP)"
            }
            Operation::BoardUpdate => {
                "UPDATE TBL_BOARD SET TITLE = :title, CONTENTS = :contents, KIND = :kind, \
                 UDATETIME = CURRENT_TIMESTAMP WHERE BOARDNO = :boardNo"
            }
            Operation::BoardDelete => "DELETE FROM TBL_BOARD WHERE BOARDNO = :boardNo",
            Operation::UserList => r#"SELECT USERID AS "USERID" FROM TBL_USER ORDER BY USERID"#,
            Operation::UserLogin => {
                r#"SELECT USERID AS "USERID" FROM TBL_USER WHERE USERID = :userId AND PWD = :pwd"#
            }
            Operation::UserJoin => "INSERT INTO TBL_USER (USERID, PWD) VALUES (:userId, :pwd)",
            Operation::UserUpdate => "UPDATE TBL_USER SET PWD = :pwd WHERE USERID = :userId",
            Operation::UserDelete => "DELETE FROM TBL_USER WHERE USERID = :userId",
        };
        Some(sql)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Operation {
    type Err = SqlGatewayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Operation::ALL
            .iter()
            .copied()
            .find(|op| op.name() == s)
            .ok_or_else(|| SqlGatewayError::invalid_input(format!("unknown operation `{s}`")))
    }
}

/// Board columns a caller may search by. The caller names one of these; the column text in
/// the SQL never comes from the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchColumn {
    Title,
    Contents,
    UserId,
}

impl SearchColumn {
    /// Resolve a caller-supplied option against the allow-list.
    ///
    /// # Errors
    /// Returns [`SqlGatewayError::InvalidInput`] for anything outside the allow-list.
    pub fn from_option(option: &str) -> Result<Self, SqlGatewayError> {
        match option {
            "title" => Ok(SearchColumn::Title),
            "contents" => Ok(SearchColumn::Contents),
            "userId" => Ok(SearchColumn::UserId),
            other => Err(SqlGatewayError::invalid_input(format!(
                "`{other}` is not a searchable column"
            ))),
        }
    }

    #[must_use]
    pub fn template(self) -> &'static str {
        match self {
            SearchColumn::Title => {
                r#"SELECT BOARDNO AS "BOARDNO", TITLE AS "TITLE", CONTENTS AS "CONTENTS", USERID AS "USERID", KIND AS "KIND", CNT AS "CNT", CDATETIME AS "CDATETIME", UDATETIME AS "UDATETIME" FROM TBL_BOARD WHERE TITLE LIKE :keyWord ESCAPE '\' ORDER BY BOARDNO DESC"#
            }
            SearchColumn::Contents => {
                r#"SELECT BOARDNO AS "BOARDNO", TITLE AS "TITLE", CONTENTS AS "CONTENTS", USERID AS "USERID", KIND AS "KIND", CNT AS "CNT", CDATETIME AS "CDATETIME", UDATETIME AS "UDATETIME" FROM TBL_BOARD WHERE CONTENTS LIKE :keyWord ESCAPE '\' ORDER BY BOARDNO DESC"#
            }
            SearchColumn::UserId => {
                r#"SELECT BOARDNO AS "BOARDNO", TITLE AS "TITLE", CONTENTS AS "CONTENTS", USERID AS "USERID", KIND AS "KIND", CNT AS "CNT", CDATETIME AS "CDATETIME", UDATETIME AS "UDATETIME" FROM TBL_BOARD WHERE USERID LIKE :keyWord ESCAPE '\' ORDER BY BOARDNO DESC"#
            }
        }
    }
}
