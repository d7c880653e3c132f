use common::model::company::IndustryTag;
use common::model::file_kind::FileKind;
use common::model::mapping::CanonicalField;
use common::reader::ReadError;
use common::upload::UploadTicket;

pub enum Msg {
    OpenFilePicker,
    FilesSelected(Vec<web_sys::File>),
    DragActive(bool),
    ColumnsRead {
        ticket: UploadTicket,
        result: Result<Vec<String>, ReadError>,
    },
    SettleElapsed(UploadTicket),
    SelectFileType(FileKind),
    AssignColumn(CanonicalField, String),
    SuggestMapping,
    WizardBack,
    DismissWizard,
    ConfirmMapping,
    ProcessingElapsed(UploadTicket),
    DismissError,
    SelectFile(String),
    SetIndustry(IndustryTag),
}
